use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use reqwest::Url;

use crate::app::ViewMode;
use crate::transfers::FilterMode;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Base URL of the transfer-events API.
    #[arg(long, env = "WALLET_NETWORK_API_URL", default_value = "http://localhost:3001")]
    api_base_url: String,

    /// Wallet address to load at startup.
    #[arg(long)]
    address: Option<String>,

    #[arg(long, value_enum, default_value_t = FilterArg::All)]
    filter: FilterArg,

    #[arg(long, value_enum, default_value_t = ViewArg::BubbleChart)]
    view: ViewArg,

    /// Give up on a transfer request after this many seconds. Unset waits forever.
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Lay the graph out once instead of animating it.
    #[arg(long)]
    no_live_physics: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FilterArg {
    All,
    In,
    Out,
}

impl From<FilterArg> for FilterMode {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => Self::All,
            FilterArg::In => Self::Incoming,
            FilterArg::Out => Self::Outgoing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    BubbleChart,
    Grid,
}

impl From<ViewArg> for ViewMode {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::BubbleChart => Self::BubbleChart,
            ViewArg::Grid => Self::Grid,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: Url,
    pub initial_address: Option<String>,
    pub filter_mode: FilterMode,
    pub view_mode: ViewMode,
    pub request_timeout: Option<Duration>,
    pub live_physics: bool,
}

impl Config {
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let api_base_url = Url::parse(args.api_base_url.trim())
            .with_context(|| format!("invalid API base URL `{}`", args.api_base_url))?;
        if api_base_url.cannot_be_a_base() || !matches!(api_base_url.scheme(), "http" | "https") {
            bail!("API base URL must be an http(s) URL, got `{api_base_url}`");
        }

        let request_timeout = match args.request_timeout_secs {
            Some(0) => bail!("--request-timeout-secs must be greater than zero"),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let initial_address = args
            .address
            .map(|address| address.trim().to_owned())
            .filter(|address| !address.is_empty());

        Ok(Self {
            api_base_url,
            initial_address,
            filter_mode: args.filter.into(),
            view_mode: args.view.into(),
            request_timeout,
            live_physics: !args.no_live_physics,
        })
    }
}
