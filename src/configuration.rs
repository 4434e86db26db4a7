use std::{env, error, net::IpAddr, num::NonZeroUsize, thread};

#[derive(Debug, Clone)]
pub struct Configuration {
    host: IpAddr,
    port: u16,
    threads: usize,
}

fn var(key: &str, default: Option<String>) -> Result<String, String> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(_) => default.ok_or(format!("Missing {}", key)),
    }
}

fn var_map<T, E: error::Error>(key: &str, mut f: impl FnMut(&str) -> Result<T, E>, default: Option<T>) -> Result<T, String> {
    match var(key, None) {
        Ok(value) => f(&value).map_err(|_| format!("Invalid {} {}", key, value)),
        Err(err) => default.ok_or(err),
    }
}

fn default_threads() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

impl Configuration {
    pub fn new() -> Result<Self, String> {
        let host = var_map("HOST", |host| host.parse(), Some(IpAddr::from([127, 0, 0, 1])))?;
        let port = var_map("PORT", |port| port.parse(), Some(8000))?;
        let threads = var_map("THREADS", |threads| threads.parse::<NonZeroUsize>(), Some(default_threads()))?.get();
        Ok(Self { host, port, threads })
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn threads(&self) -> usize {
        self.threads
    }
}
