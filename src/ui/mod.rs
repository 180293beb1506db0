pub mod chat_loop;
pub mod renderer;
pub mod scroll;
pub mod transcript;
