use chrono::{Datelike, Local};
use rand::Rng;

/// Generates a request ticket number, `NNNNN-YYYY`.
///
/// The serial is random in `10000..=99999` and the suffix is the current
/// local year. Uniqueness is only enforced by the structured store's index.
pub fn generate_ticket_number() -> String {
    format_ticket(rand::rng().random_range(10000..=99999), Local::now().year())
}

fn format_ticket(serial: u32, year: i32) -> String {
    format!("{:05}-{:04}", serial, year)
}

/// True for strings shaped like `NNNNN-YYYY`.
pub fn is_ticket_number(s: &str) -> bool {
    let Some((serial, year)) = s.split_once('-') else {
        return false;
    };
    serial.len() == 5
        && year.len() == 4
        && serial.bytes().all(|b| b.is_ascii_digit())
        && year.bytes().all(|b| b.is_ascii_digit())
}
