// Relay module - HTTP server that streams an editor persona's reply as SSE
//
// One handler per request: CORS and method gate, validate the user message,
// open a streaming call to the upstream completion API, and re-frame each
// upstream line as an SSE `data:` frame for the browser.

mod error;
mod handlers;
mod server;
mod sse;
mod state;
mod upstream;


pub use server::start_relay;
