use rand::Rng;
use std::time::Duration;

/// Highest exponent applied to the base delay.
const MAX_EXPONENT: u32 = 10;

/// Exponential backoff delay with ±30% jitter for retry number `attempt`
/// (zero-based).
pub fn calculate_backoff_delay(attempt: u32, base_delay: Duration) -> Duration {
    let capped_attempt = attempt.min(MAX_EXPONENT);
    let base = base_delay.saturating_mul(2_u32.saturating_pow(capped_attempt));

    let jitter_factor = rand::thread_rng().gen_range(0.7..1.3);
    base.mul_f64(jitter_factor)
}
