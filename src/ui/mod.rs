pub mod chat_loop;
mod emphasis;
pub mod renderer;
