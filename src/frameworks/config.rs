use std::{env, net::IpAddr, str::FromStr, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub const GAME_EVENT_CHANNEL_CAPACITY: usize = 1024;
pub const OUTBOUND_CHANNEL_CAPACITY: usize = 1024;
// Per-connection queue; a slow client loses messages past this.
pub const CLIENT_QUEUE_CAPACITY: usize = 128;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TICK_HZ: u32 = 60;
const DEFAULT_BROADCAST_HZ: u32 = 20;
const MAX_RATE_HZ: u32 = 1000;

pub fn http_port() -> u16 {
    parse_env("ARENA_SERVER_PORT").unwrap_or(DEFAULT_PORT)
}

pub fn bind_addr() -> IpAddr {
    parse_env("ARENA_BIND_ADDR").unwrap_or(IpAddr::from([127, 0, 0, 1]))
}

pub fn tick_interval() -> Duration {
    rate_to_interval(parse_env("ARENA_TICK_HZ"), DEFAULT_TICK_HZ)
}

pub fn broadcast_interval() -> Duration {
    rate_to_interval(parse_env("ARENA_BROADCAST_HZ"), DEFAULT_BROADCAST_HZ)
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn rate_to_interval(rate: Option<u32>, default_hz: u32) -> Duration {
    let hz = rate
        .filter(|hz| (1..=MAX_RATE_HZ).contains(hz))
        .unwrap_or(default_hz);
    Duration::from_micros(1_000_000 / u64::from(hz))
}
