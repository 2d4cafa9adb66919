use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "http-server")]
#[command(about = "A small HTTP/1.1 server speaking the protocol by hand", long_about = None)]
pub struct Config {
    /// Directory that `/files/{name}` reads from and writes to
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:4221")]
    pub address: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["http-server"]);

        assert_eq!(config.directory, PathBuf::from("."));
        assert_eq!(config.address, "0.0.0.0:4221".parse().unwrap());
    }

    #[test]
    fn directory_flag() {
        let config = Config::parse_from(["http-server", "--directory", "/tmp/data/"]);

        assert_eq!(config.directory, PathBuf::from("/tmp/data/"));
    }

    #[test]
    fn rejects_bad_address() {
        assert!(Config::try_parse_from(["http-server", "--address", "nope"]).is_err());
    }
}
