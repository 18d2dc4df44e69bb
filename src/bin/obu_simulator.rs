//! OBU Simulator
//!
//! Sends random distance reports to the aggregator over gRPC.
//!
//! Run with: cargo run --bin obu_simulator --release -- --obus 10 --reports 1000

use std::time::Instant;

use rand::Rng;

use obu_aggregator::config::GRPC_ENDPOINT_ENV;
use obu_aggregator::grpc::proto::aggregator_client::AggregatorClient;
use obu_aggregator::grpc::proto::AggregateRequest;

fn arg_or(args: &[String], flag: &str, default: u64) -> u64 {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let obu_count = arg_or(&args, "--obus", 10).max(1);
    let report_count = arg_or(&args, "--reports", 100);

    let mut endpoint = std::env::var(GRPC_ENDPOINT_ENV)?;
    // The server binds every interface for ":port"; dial it locally
    if endpoint.starts_with(':') {
        endpoint.insert_str(0, "127.0.0.1");
    }

    println!("OBU Simulator - Sending {} reports for {} OBUs", report_count, obu_count);
    println!("Connecting to {}...", endpoint);

    let mut client = AggregatorClient::connect(format!("http://{}", endpoint)).await?;

    let mut rng = rand::thread_rng();
    let obu_ids: Vec<i64> = (0..obu_count).map(|_| rng.gen_range(1..i64::from(u32::MAX))).collect();

    let start = Instant::now();
    let mut success_count = 0u64;

    for i in 0..report_count {
        let request = AggregateRequest {
            obu_id: obu_ids[(i % obu_count) as usize],
            value: (rng.gen_range(0.0..100.0f64) * 1000.0).round() / 1000.0,
            unix: chrono::Utc::now().timestamp(),
        };

        match client.aggregator(request).await {
            Ok(_) => success_count += 1,
            Err(status) => eprintln!("Report {} rejected: {}", i + 1, status.message()),
        }

        if (i + 1) % 1000 == 0 {
            println!("Sent {} reports...", i + 1);
        }
    }

    let elapsed = start.elapsed();
    let rate = success_count as f64 / elapsed.as_secs_f64();

    println!("\n=== Simulation Results ===");
    println!("OBU ids: {:?}", obu_ids);
    println!("Total reports: {}", report_count);
    println!("Successful: {}", success_count);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rate: {:.0} reports/sec", rate);

    Ok(())
}
