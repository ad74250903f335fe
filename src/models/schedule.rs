use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    pub id: String,
    pub name: String,
    pub price: String,
    pub duration_minutes: u32,
}

impl ServiceOffering {
    fn new(id: &str, name: &str, price: &str, duration_minutes: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price: price.to_string(),
            duration_minutes,
        }
    }
}

/// Opening hours, closed weekdays and the service menu. Fixed for the life of
/// the process and handed to the slot calculator and validator through
/// `AppState`.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// First bookable hour.
    pub opening_hour: u32,
    /// Hour at which the shop closes; not itself bookable.
    pub closing_hour: u32,
    pub closed_days: Vec<Weekday>,
    pub services: Vec<ServiceOffering>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            opening_hour: 8,
            closing_hour: 17,
            closed_days: vec![Weekday::Sun],
            services: vec![
                ServiceOffering::new("haircut", "Haircut", "$15", 45),
                ServiceOffering::new("beard", "Beard Trim", "$10", 30),
                ServiceOffering::new("haircut-beard", "Haircut + Beard", "$22", 60),
                ServiceOffering::new("kids", "Kids Haircut", "$12", 30),
            ],
        }
    }
}

impl Schedule {
    pub fn is_closed(&self, date: NaiveDate) -> bool {
        self.closed_days.contains(&date.weekday())
    }

    pub fn is_open_hour(&self, hour: u32) -> bool {
        hour >= self.opening_hour && hour < self.closing_hour
    }

    /// Every bookable hour as `HH:00`, earliest first.
    pub fn hourly_grid(&self) -> Vec<String> {
        (self.opening_hour..self.closing_hour)
            .map(|h| format!("{h:02}:00"))
            .collect()
    }

    pub fn service_duration(&self, name: &str) -> Option<u32> {
        self.services
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.duration_minutes)
    }

    /// e.g. "Sundays" or "Saturdays and Sundays".
    pub fn closed_days_label(&self) -> String {
        let mut days = self.closed_days.clone();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();

        let names: Vec<String> = days.iter().map(|d| format!("{}s", weekday_name(*d))).collect();
        match names.split_last() {
            None => String::new(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
        }
    }

    /// e.g. "8 AM to 5 PM".
    pub fn business_hours_label(&self) -> String {
        format!(
            "{} to {}",
            twelve_hour(self.opening_hour),
            twelve_hour(self.closing_hour)
        )
    }

    pub fn closed_day_names(&self) -> Vec<&'static str> {
        self.closed_days.iter().map(|d| weekday_name(*d)).collect()
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn twelve_hour(hour: u32) -> String {
    let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
    let h = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{h} {suffix}")
}
