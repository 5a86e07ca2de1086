// Startup module - displays banner and relay status
//
// Printed once before the server starts taking requests, so an operator can
// see at a glance where the relay listens, where it forwards, and whether
// the upstream credential is present.

use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Print the startup banner
pub fn print_startup(config: &Config) {
    use colors::*;

    println!();
    println!("  {BOLD}{CYAN}Editor Relay{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}SSE relay for the editor chat persona{RESET}");
    println!();

    // Config file status
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }

    if config.has_api_key() {
        println!("  {DIM}Credential:{RESET} {GREEN}✓{RESET}");
    } else {
        println!(
            "  {DIM}Credential:{RESET} {YELLOW}missing{RESET} {DIM}(requests will get an error frame){RESET}"
        );
    }
    println!();

    println!(
        "  {MAGENTA}▸{RESET} Relay listening on {BOLD}{}{RESET}",
        config.bind_addr
    );
    println!(
        "  {MAGENTA}▸{RESET} Upstream {} {DIM}({}){RESET}",
        config.api_url, config.model
    );
    println!(
        "  {MAGENTA}▸{RESET} Allowed origin {}",
        config.allowed_origin
    );
    println!();
}

/// Log the same facts through tracing (ends up in file logs too)
pub fn log_startup(config: &Config) {
    tracing::info!(
        version = VERSION,
        bind_addr = %config.bind_addr,
        api_url = %config.api_url,
        model = %config.model,
        allowed_origin = %config.allowed_origin,
        credential = config.has_api_key(),
        read_timeout_secs = config.upstream.read_timeout_secs,
        "Relay configured"
    );
    if !config.has_api_key() {
        tracing::warn!(
            "{} is not set; every chat request will be answered with an error frame",
            crate::config::API_KEY_ENV
        );
    }
}
