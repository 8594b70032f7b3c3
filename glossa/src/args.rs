use std::path::PathBuf;

use clap::Parser;

/// Glossa translation gateway
#[derive(Debug, Parser)]
#[command(name = "glossa", about = "OpenAI-compatible chat completions backed by a translation service")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "glossa.toml", env = "GLOSSA_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "GLOSSA_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_flag_parses_socket_address() {
        let args = Args::try_parse_from(["glossa", "--config", "custom.toml", "--listen", "127.0.0.1:9000"]).unwrap();

        assert_eq!(args.config, PathBuf::from("custom.toml"));
        assert_eq!(args.listen, Some("127.0.0.1:9000".parse().unwrap()));
    }

    #[test]
    fn invalid_listen_is_rejected() {
        assert!(Args::try_parse_from(["glossa", "--listen", "not-an-address"]).is_err());
    }
}
