//! Text and JSON views over normalized forecast records.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Value, json};
use skycast_core::{
    CurrentObservation, DailyRecord, DerivedMetrics, Forecast, HourlyRecord, RealFeelInputs,
    Status,
};

pub fn current_rich(obs: &CurrentObservation, inputs: RealFeelInputs) -> String {
    let m = DerivedMetrics::from_observation(obs, inputs);

    format!(
        "Current Weather\n\
         🌡️ Temperature: {:.1}°F\n\
         💨 Wind Speed: {:.1} mph\n\
         🤒 Real Feel: {:.1}°F\n\
         {}\n\
         👉 {}",
        m.temperature_f,
        m.windspeed_mph,
        m.apparent_temperature_f,
        m.precipitation_category,
        m.recommendation,
    )
}

pub fn current_brief(obs: &CurrentObservation) -> String {
    let m = DerivedMetrics::from_observation(obs, RealFeelInputs::Rounded);

    format!(
        "🌡️ Temperature: {:.1}°F\n💨 Wind Speed: {} km/h\n{}",
        m.temperature_f,
        obs.windspeed_kmh,
        m.precipitation_category,
    )
}

pub fn daily(records: &[DailyRecord]) -> String {
    let mut output = String::from("5-Day Forecast\n");
    for record in records {
        output.push_str(&format!(
            "\n{}\n  🌡️ {}\n  ☔ Precipitation: {} mm\n",
            format_date(&record.date),
            record.range(),
            record.precipitation_sum_mm,
        ));
    }
    output
}

pub fn hourly(records: &[HourlyRecord], inputs: RealFeelInputs) -> String {
    let mut output = String::from("Hourly Forecast\n");
    for record in records {
        let m = record.metrics(inputs);
        output.push_str(&format!(
            "\n{}  🌡️ {:.1}°F  💨 {:.1} mph  🤒 {:.1}°F  🌞 UV Index: {}  🌧️ {:.2} in",
            format_hour(&record.time),
            m.temperature_f,
            m.windspeed_mph,
            m.real_feel_f,
            m.uv_index,
            m.precipitation_in,
        ));
    }
    output
}

pub fn forecast_json(forecast: &Forecast, inputs: RealFeelInputs) -> Value {
    let data = match forecast {
        Forecast::Current(obs) => json!({
            "observation": obs,
            "metrics": DerivedMetrics::from_observation(obs, inputs),
        }),
        Forecast::Daily(records) => json!({ "records": records }),
        Forecast::Hourly(records) => {
            let rows: Vec<Value> = records
                .iter()
                .map(|r| json!({ "record": r, "metrics": r.metrics(inputs) }))
                .collect();
            json!({ "records": rows })
        }
    };

    json!({
        "status": Status::Ready,
        "mode": forecast.mode(),
        "data": data,
    })
}

pub fn error_json(message: &str) -> Value {
    json!({ "status": Status::Error, "message": message })
}

/// `2024-01-01` -> `Mon, Jan 1 2024`; unparsable input is shown as-is.
fn format_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%a, %b %-d %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// `2024-06-01T13:00` -> `13:00`.
fn format_hour(time: &str) -> String {
    NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|_| time.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::UvIndex;

    fn obs() -> CurrentObservation {
        CurrentObservation {
            temperature_c: 21.0,
            windspeed_kmh: 30.0,
            precipitation_mm: 0.0,
        }
    }

    #[test]
    fn rich_view_includes_recommendation() {
        let out = current_rich(&obs(), RealFeelInputs::Rounded);
        assert!(out.contains("69.8°F"));
        assert!(out.contains("18.6 mph"));
        assert!(out.contains("windy, secure loose items"));
        assert!(out.contains("No Precipitation"));
    }

    #[test]
    fn brief_view_keeps_kmh() {
        let out = current_brief(&obs());
        assert!(out.contains("30 km/h"));
        assert!(!out.contains("Real Feel"));
    }

    #[test]
    fn daily_view_lists_records_in_order() {
        let records = vec![
            DailyRecord {
                date: "2024-01-01".into(),
                temp_min_c: 0.0,
                temp_max_c: 10.0,
                precipitation_sum_mm: 0.0,
            },
            DailyRecord {
                date: "2024-01-02".into(),
                temp_min_c: 5.0,
                temp_max_c: 15.0,
                precipitation_sum_mm: 2.0,
            },
        ];

        let out = daily(&records);
        let first = out.find("0°C-10°C").expect("first range");
        let second = out.find("5°C-15°C").expect("second range");
        assert!(first < second);
        assert!(out.contains("Mon, Jan 1 2024"));
        assert!(out.contains("Precipitation: 2 mm"));
    }

    #[test]
    fn hourly_view_marks_missing_uv() {
        let records = vec![HourlyRecord {
            time: "2024-06-01T13:00".into(),
            temperature_c: 20.0,
            windspeed_kmh: 0.0,
            precipitation_mm: 2.54,
            uv_index: UvIndex::Unavailable,
        }];

        let out = hourly(&records, RealFeelInputs::Rounded);
        assert!(out.contains("13:00"));
        assert!(out.contains("68.0°F"));
        assert!(out.contains("UV Index: N/A"));
        assert!(out.contains("0.10 in"));
    }

    #[test]
    fn json_carries_status_and_mode() {
        let value = forecast_json(&Forecast::Current(obs()), RealFeelInputs::Rounded);
        assert_eq!(value["status"], "ready");
        assert_eq!(value["mode"], "current");
        assert_eq!(
            value["data"]["metrics"]["recommendation"],
            "windy, secure loose items"
        );
        assert_eq!(
            value["data"]["metrics"]["precipitation_category"],
            "No Precipitation"
        );

        let err = error_json("Invalid latitude");
        assert_eq!(err["status"], "error");
        assert_eq!(err["message"], "Invalid latitude");
    }

    #[test]
    fn unparsable_dates_pass_through() {
        assert_eq!(format_date("tomorrow"), "tomorrow");
        assert_eq!(format_hour("noon"), "noon");
    }
}
