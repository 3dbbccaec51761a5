/// First leg of the first driving route, as human-readable text.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionSummary {
    pub duration: String,
    pub distance: String,
    pub start_address: String,
}

impl DirectionSummary {
    pub fn travel_line(&self) -> String {
        format!(
            "This service is {} away. It will be approximately {} drive.",
            self.distance, self.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_travel_line() {
        let summary = DirectionSummary {
            duration: "12 mins".to_string(),
            distance: "3.4 km".to_string(),
            start_address: "221B Baker St, London NW1 6XE, UK".to_string(),
        };

        assert_eq!(
            summary.travel_line(),
            "This service is 3.4 km away. It will be approximately 12 mins drive."
        );
    }
}
