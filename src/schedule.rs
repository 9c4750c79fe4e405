//! Booking calendar embed

use crate::config::ScheduleConfig;
use crate::theme::Theme;

/// Builds the iframe URL for the booking page
#[derive(Debug, Clone)]
pub struct BookingEmbed {
    booking_url: String,
}

impl BookingEmbed {
    pub fn new(booking_url: impl Into<String>) -> Self {
        Self {
            booking_url: booking_url.into(),
        }
    }

    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(config.booking_url.clone())
    }

    pub fn booking_url(&self) -> &str {
        &self.booking_url
    }

    /// Week view with the page's theme and without branding
    pub fn url(&self, theme: Theme) -> String {
        let base = self.booking_url.trim_end_matches('/');
        let separator = if base.contains('?') { '&' } else { '?' };
        format!(
            "{}{}theme={}&layout=week_view&hideEventTypeDetails=false&hideBranding=true",
            base,
            separator,
            theme.as_str()
        )
    }
}

impl Default for BookingEmbed {
    fn default() -> Self {
        Self::from_config(&ScheduleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_carries_theme() {
        let embed = BookingEmbed::default();
        assert_eq!(
            embed.url(Theme::Dark),
            "https://cal.com/brycethompson/30min?theme=dark&layout=week_view&hideEventTypeDetails=false&hideBranding=true"
        );
        assert!(embed.url(Theme::Light).contains("theme=light&"));
    }

    #[test]
    fn test_existing_query_is_extended() {
        let embed = BookingEmbed::new("https://cal.example/me/15min?month=2024-05");
        assert!(embed
            .url(Theme::Light)
            .starts_with("https://cal.example/me/15min?month=2024-05&theme=light"));
    }
}
