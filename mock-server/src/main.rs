use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let args = Args::parse().context("parsing arguments")?;
    let addr = SocketAddr::from((args.host, args.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, email = %args.email, "mock pet service listening");
    petfriends_mock::run(listener, [(args.email, args.password)]).await?;
    Ok(())
}

#[derive(Debug)]
struct Args {
    host: IpAddr,
    port: u16,
    email: String,
    password: String,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut pargs = pico_args::Arguments::from_env();

        let host = pargs
            .opt_value_from_str(["-h", "--host"])
            .context("parsing host argument")?;
        let port = pargs
            .opt_value_from_str(["-p", "--port"])
            .context("parsing port argument")?;
        let email = pargs
            .opt_value_from_str("--email")
            .context("parsing email argument")?;
        let password = pargs
            .opt_value_from_str("--password")
            .context("parsing password argument")?;

        let args = Self {
            host: host.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            port: port.unwrap_or(3000),
            email: email.unwrap_or_else(|| "user@example.com".to_string()),
            password: password.unwrap_or_else(|| "secret".to_string()),
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "unused arguments left");
        }
        Ok(args)
    }
}
