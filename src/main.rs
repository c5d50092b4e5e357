// Trackside binary
// Runs the analysis once over data/tram and data/car and prints the results

use std::process::ExitCode;

use trackside::{run, PipelineConfig};

fn main() -> ExitCode {
    env_logger::init();

    let config = PipelineConfig::default();

    let report = match run(&config) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("trackside: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("Accuracy: {:.4}", report.accuracy);
    println!("Precision: {:.4}", report.precision);
    println!("Recall: {:.4}", report.recall);
    println!(
        "Sample 0: predicted={} truth={}",
        report.sample_predicted, report.sample_truth
    );

    ExitCode::SUCCESS
}
