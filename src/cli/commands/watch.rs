use super::read_enrollment;
use pfa_access::clock::SystemClock;
use pfa_access::config::Config;
use pfa_access::error::Result;
use pfa_access::expiry::{format_time_remaining, urgency_tier, CountdownSlot};
use pfa_access::models::TimeRemaining;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn print_line(course: &str, remaining: &TimeRemaining) {
    println!(
        "{}  {:>10}  {:>5.1}%  {}",
        course,
        format_time_remaining(remaining),
        remaining.percentage,
        urgency_tier(remaining).as_str()
    );
}

pub async fn execute(path: &Path, interval: Option<u64>) -> Result<()> {
    let config = Config::load()?;
    let enrollment = read_enrollment(path)?;
    let course = enrollment.course_label().to_string();
    let period = interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.refresh_interval());

    tracing::info!(
        "Watching {} every {}s",
        path.display(),
        period.as_secs()
    );

    let mut slot = CountdownSlot::new();
    let ticker = slot.mount(enrollment, Arc::new(SystemClock), period);
    print_line(&course, &ticker.current());

    loop {
        tokio::select! {
            next = ticker.changed() => match next {
                Some(remaining) => print_line(&course, &remaining),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping countdown");
                break;
            }
        }
    }

    slot.unmount();
    Ok(())
}
