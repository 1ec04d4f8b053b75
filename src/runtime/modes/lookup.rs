//! Lookup mode
//!
//! Resolves addresses given on the command line and prints them to stdout.

use colored::Colorize;
use std::time::Instant;

use crate::services::geoip::{GeoIpDb, Location};

/// 单行文本格式
pub fn format_location(location: &Location) -> String {
    let place = match (location.city.is_empty(), location.country.is_empty()) {
        (false, false) => format!("{}, {}", location.city, location.country),
        (true, false) => location.country.clone(),
        (false, true) => location.city.clone(),
        (true, true) => "-".to_string(),
    };
    format!(
        "{} -> {} [{}] {}",
        location.ip.cyan(),
        place.green(),
        location.iso_code.yellow(),
        location.timezone.dimmed()
    )
}

/// Run lookup mode
///
/// Returns `true` when every address resolved.
pub fn run_lookup(db: &GeoIpDb, ips: &[String], json: bool) -> bool {
    let start = Instant::now();
    let mut all_ok = true;

    for ip in ips {
        match db.get_location(ip) {
            Ok(location) if json => match serde_json::to_string(&location) {
                Ok(line) => println!("{}", line),
                Err(e) => {
                    eprintln!("{} {}: {}", "✗".bold().red(), ip, e);
                    all_ok = false;
                }
            },
            Ok(location) => println!("{}", format_location(&location)),
            Err(e) => {
                eprintln!("{} {}", "✗".bold().red(), e.format_simple());
                all_ok = false;
            }
        }
    }

    if !json {
        println!(
            "{} {} lookup(s) in {:?}",
            "ℹ".bold().blue(),
            ips.len().to_string().green(),
            start.elapsed()
        );
    }

    all_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_location_full() {
        colored::control::set_override(false);
        let location = Location {
            city: "Kathmandu".to_string(),
            ip: "110.44.127.177".to_string(),
            country: "Nepal".to_string(),
            iso_code: "NP".to_string(),
            timezone: "Asia/Kathmandu".to_string(),
        };
        assert_eq!(
            format_location(&location),
            "110.44.127.177 -> Kathmandu, Nepal [NP] Asia/Kathmandu"
        );
    }

    #[test]
    fn test_format_location_without_names() {
        colored::control::set_override(false);
        let location = Location {
            ip: "1.1.1.1".to_string(),
            ..Location::default()
        };
        assert_eq!(format_location(&location), "1.1.1.1 -> - [] ");
    }
}
