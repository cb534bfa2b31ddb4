// mdshare services
// Services provide configuration, title generation and HTML rendering.

pub mod renderer;
pub mod settings_engine;
pub mod title_generator;
