use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};

/// Deterministic SplitMix64 stream so reruns write identical files.
struct PriceRng(u64);

impl PriceRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Normal sample via Box-Muller.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.uniform().max(f64::MIN_POSITIVE);
        let u2 = self.uniform();
        mean + std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// Trading days (Mon–Fri) starting at `start`.
fn trading_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    start
        .iter_days()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(count)
        .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() {
    let mut rng = PriceRng(20230102);

    let symbols = [("RELIANCE", 2450.0), ("INFY", 1480.0), ("HDFCBANK", 1620.0)];
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).expect("valid start date");
    let days = trading_days(start, 250);

    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).expect("Failed to create data directory");

    for (symbol, start_price) in symbols {
        let output_path = out_dir.join(format!("{symbol}.csv"));
        let mut writer =
            csv::Writer::from_path(&output_path).expect("Failed to create output file");
        writer
            .write_record(["Date", "Symbol", "Open", "High", "Low", "Close", "Volume"])
            .expect("Failed to write header");

        // Geometric random walk on the close.
        let mut prev_close: f64 = start_price;
        for day in &days {
            let open = prev_close * (1.0 + rng.normal(0.0, 0.004));
            let close = open * (1.0 + rng.normal(0.0003, 0.012));
            let high = open.max(close) * (1.0 + rng.uniform() * 0.01);
            let low = open.min(close) * (1.0 - rng.uniform() * 0.01);
            let volume = (rng.normal(5_000_000.0, 1_200_000.0)).max(100_000.0) as u64;

            writer
                .write_record([
                    day.format("%Y-%m-%d").to_string(),
                    symbol.to_string(),
                    round2(open).to_string(),
                    round2(high).to_string(),
                    round2(low).to_string(),
                    round2(close).to_string(),
                    volume.to_string(),
                ])
                .expect("Failed to write row");
            prev_close = close;
        }
        writer.flush().expect("Failed to flush output");

        println!(
            "Wrote {} trading days for {symbol} to {}",
            days.len(),
            output_path.display()
        );
    }
}
