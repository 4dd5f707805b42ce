//! # Web Gateway
//!
//! Serves the chat page and accepts form posts. Each browser session keeps
//! its chat history in a signed cookie; server-side state is immutable.

mod page;
mod server;
mod session;

pub use page::PageRenderer;
pub use server::{
    AppState, GatewayError, SharedState, router as gateway_router, run as run_gateway,
};
pub use session::{SessionCodec, find_cookie};
