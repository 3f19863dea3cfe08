//! Simple example of using proxy-manager.
//!
//! Reads `PROXY_FILE` (default `proxies.txt`) and falls back to the built-in
//! list when it is missing.

use proxy_manager::{parse_validate_flag, ProxyPoolConfig, ProxyPoolMiddleware, ProxySelector};
use reqwest_middleware::ClientBuilder;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ProxyPoolConfig::from_env();
    let validate = parse_validate_flag(env::var("VALIDATE").ok().as_deref());

    println!("Loading proxies from {}...", config.source);
    let selector = ProxySelector::from_config(&config).await;
    println!("{} proxies in pool", selector.pool().len());

    match selector.get_proxy(validate).await {
        Ok(proxy) => println!("Got proxy: {}", proxy),
        Err(e) => println!("No proxy ({}): {}", e.status_code(), e),
    }

    let client = ClientBuilder::new(reqwest::Client::new())
        .with(ProxyPoolMiddleware::new(selector).validate(validate))
        .build();

    println!("Sending request...");
    let response = client.get("https://httpbin.org/ip").send().await?;

    println!("Status: {}", response.status());
    println!("Response: {}", response.text().await?);

    Ok(())
}
