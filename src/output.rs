// output formatting - readable text or raw json

use crate::api::GenerateResponse;
use crate::core::Exchange;
use serde::Serialize;

pub struct Output;

impl Output {
    pub fn generated(response: &GenerateResponse) {
        println!("id: {}", response.id);
        println!("user: {}\n", response.user_id);
        print_styles(&response.casual_response, &response.formal_response);
    }

    pub fn history(user_id: &str, records: &[Exchange]) {
        if records.is_empty() {
            println!("no history found for {user_id}");
            return;
        }

        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(60));
            }
            println!(
                "query: {} ({})\n",
                record.query,
                record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            print_styles(&record.casual_response, &record.formal_response);
        }
    }

    pub fn users(user_ids: &[String]) {
        if user_ids.is_empty() {
            println!("no users yet");
            return;
        }
        for id in user_ids {
            println!("{id}");
        }
    }

    // raw json for scripts
    pub fn raw<T: Serialize>(value: &T) {
        println!("{}", serde_json::to_string(value).unwrap_or_default());
    }
}

fn print_styles(casual: &str, formal: &str) {
    println!("casual:\n{}\n", or_placeholder(casual));
    println!("formal:\n{}\n", or_placeholder(formal));
}

fn or_placeholder(text: &str) -> &str {
    if text.is_empty() { "no response" } else { text }
}
