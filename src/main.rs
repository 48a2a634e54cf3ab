//! Delivery Admin - 投递定义管理后台
//!
//! Usage:
//! - Normal mode: `delivery-admin`
//! - With custom port: `delivery-admin --port 9000`

use delivery_admin::RuntimeConfig;

/// 解析命令行参数
fn parse_args() -> RuntimeConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RuntimeConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" if i + 1 < args.len() => {
                config.port_override = args[i + 1].parse().ok();
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    config
}

fn print_help() {
    println!("Delivery Admin - 投递定义管理后台");
    println!();
    println!("USAGE:");
    println!("    delivery-admin [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>    Override the listening port");
    println!("    -h, --help       Print help information");
    println!();
    println!("ENVIRONMENT:");
    println!("    DELIVERY_ADMIN_API_KEY     API key required in x-api-key");
    println!("    ZATO_SERVICE_URL           Base URL of the service invoker");
    println!("    ZATO_SERVICE_USER          Basic auth user for the service invoker");
    println!("    ZATO_SERVICE_PASSWORD      Basic auth password");
    println!("    DEFAULT_TIMEZONE           Default UTC offset, e.g. +02:00");
}

#[tokio::main]
async fn main() {
    let config = parse_args();

    if let Err(e) = delivery_admin::init_and_run_with_config(config).await {
        tracing::error!(error = %e, "Delivery admin failed to start");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
