use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    Credential,
    config::DEFAULT_BASE_URL,
    error::{DEFAULT_NOT_FOUND, LookupError},
    model::{Atmosphere, Coordinates, Temperature, WeatherRecord, Wind},
};

use super::{HttpFetch, LookupResult, WeatherLookup};

/// Provider status code for a successful lookup.
const COD_OK: f64 = 200.0;

/// Current-weather lookups against OpenWeatherMap.
///
/// One GET per call, no retries. All failures come back as [`LookupError`];
/// the underlying cause is logged and then dropped.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient<F> {
    fetch: F,
    base_url: String,
}

impl<F: HttpFetch> OpenWeatherClient<F> {
    pub fn new(fetch: F) -> Self {
        Self::with_base_url(fetch, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(fetch: F, base_url: impl Into<String>) -> Self {
        Self {
            fetch,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl<F: HttpFetch> WeatherLookup for OpenWeatherClient<F> {
    async fn lookup(&self, city: &str, credential: &Credential) -> LookupResult {
        if city.trim().is_empty() {
            return Err(LookupError::EmptyInput);
        }

        if !credential.is_configured() {
            warn!("OpenWeatherMap API key not configured; skipping request");
            return Err(LookupError::MissingCredential);
        }

        let body = self
            .fetch
            .get_json(
                &self.base_url,
                &[
                    ("q", city),
                    ("appid", credential.as_str()),
                    ("units", "metric"),
                ],
            )
            .await
            .map_err(|e| {
                warn!(city, error = %format!("{e:#}"), "weather request failed");
                LookupError::TransportFailure
            })?;

        let result = classify(body);
        match &result {
            Ok(record) => info!(city, resolved = %record.city_name, "weather lookup succeeded"),
            Err(e) => info!(city, error = %e, "weather lookup unsuccessful"),
        }
        result
    }
}

/// Sort a decoded body into success or failure by its `cod` field.
///
/// Only the number 200 (`200` or `200.0`) counts as success; OpenWeatherMap
/// sends errors with a string code such as `"404"`.
fn classify(body: Value) -> LookupResult {
    if body.get("cod").and_then(Value::as_f64) != Some(COD_OK) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_NOT_FOUND);
        return Err(LookupError::CityNotFound(message.to_string()));
    }

    let parsed: OwCurrentResponse = serde_json::from_value(body).map_err(|e| {
        warn!(error = %e, "malformed OpenWeather success payload");
        LookupError::TransportFailure
    })?;

    Ok(parsed.into_record())
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: f64,
    humidity: f64,
    sea_level: Option<f64>,
    grnd_level: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: f64,
    gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    id: i64,
    name: String,
    base: String,
    timezone: i64,
    visibility: Option<f64>,
    coord: Option<OwCoord>,
    main: OwMain,
    wind: OwWind,
    clouds: OwClouds,
    sys: OwSys,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

impl OwCurrentResponse {
    fn into_record(self) -> WeatherRecord {
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_default();

        WeatherRecord {
            city_name: self.name,
            country_code: self.sys.country,
            coordinates: self.coord.map(|c| Coordinates {
                lat: c.lat,
                lon: c.lon,
            }),
            temperature: Temperature {
                current: self.main.temp,
                feels_like: self.main.feels_like,
                min: self.main.temp_min,
                max: self.main.temp_max,
            },
            atmosphere: Atmosphere {
                pressure: self.main.pressure,
                humidity_pct: self.main.humidity,
                sea_level: self.main.sea_level,
                ground_level: self.main.grnd_level,
            },
            visibility_m: self.visibility,
            wind: Wind {
                speed_mps: self.wind.speed,
                direction_deg: self.wind.deg,
                gust_mps: self.wind.gust,
            },
            cloudiness_pct: self.clouds.all,
            description,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
            utc_offset_seconds: self.timezone,
            city_id: self.id,
            base: self.base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;
    use std::sync::Mutex;

    /// Scripted fetch that records every request it sees.
    #[derive(Debug)]
    struct FakeFetch {
        reply: std::result::Result<Value, String>,
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FakeFetch {
        fn replying(body: Value) -> Self {
            Self {
                reply: Ok(body),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                reply: Err(reason.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpFetch for FakeFetch {
        async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> anyhow::Result<Value> {
            self.calls.lock().unwrap().push((
                url.to_string(),
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            self.reply.clone().map_err(|e| anyhow!(e))
        }
    }

    fn london() -> Value {
        json!({
            "coord": { "lon": -0.1257, "lat": 51.5085 },
            "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds" }],
            "base": "stations",
            "main": {
                "temp": 14.2, "feels_like": 13.6, "temp_min": 12.9, "temp_max": 15.3,
                "pressure": 1012, "humidity": 77, "sea_level": 1012, "grnd_level": 1008
            },
            "visibility": 10000,
            "wind": { "speed": 4.63, "deg": 250, "gust": 8.2 },
            "clouds": { "all": 75 },
            "dt": 1718900000,
            "sys": { "country": "GB", "sunrise": 1718941389, "sunset": 1719001205 },
            "timezone": 3600,
            "id": 2643743,
            "name": "London",
            "cod": 200
        })
    }

    fn key() -> Credential {
        Credential::new("test-key")
    }

    #[tokio::test]
    async fn success_maps_every_field() {
        let client = OpenWeatherClient::new(FakeFetch::replying(london()));
        let record = client.lookup("London", &key()).await.expect("success");

        assert_eq!(record.city_name, "London");
        assert_eq!(record.country_code.as_deref(), Some("GB"));
        assert_eq!(
            record.coordinates,
            Some(Coordinates {
                lat: 51.5085,
                lon: -0.1257
            })
        );
        assert_eq!(record.temperature.current, 14.2);
        assert_eq!(record.temperature.feels_like, 13.6);
        assert_eq!(record.temperature.min, 12.9);
        assert_eq!(record.temperature.max, 15.3);
        assert_eq!(record.atmosphere.pressure, 1012.0);
        assert_eq!(record.atmosphere.humidity_pct, 77.0);
        assert_eq!(record.atmosphere.sea_level, Some(1012.0));
        assert_eq!(record.atmosphere.ground_level, Some(1008.0));
        assert_eq!(record.visibility_m, Some(10000.0));
        assert_eq!(record.wind.speed_mps, 4.63);
        assert_eq!(record.wind.direction_deg, 250.0);
        assert_eq!(record.wind.gust_mps, Some(8.2));
        assert_eq!(record.cloudiness_pct, 75.0);
        assert_eq!(record.description, "broken clouds");
        assert_eq!(record.sunrise, 1718941389);
        assert_eq!(record.sunset, 1719001205);
        assert_eq!(record.utc_offset_seconds, 3600);
        assert_eq!(record.city_id, 2643743);
        assert_eq!(record.base, "stations");
    }

    #[tokio::test]
    async fn sends_city_key_and_metric_units() {
        let fetch = FakeFetch::replying(london());
        let client = OpenWeatherClient::with_base_url(fetch, "http://example.test/weather");
        client.lookup("London", &key()).await.expect("success");

        let calls = client.fetch.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (url, query) = &calls[0];
        assert_eq!(url, "http://example.test/weather");
        assert!(query.contains(&("q".into(), "London".into())));
        assert!(query.contains(&("appid".into(), "test-key".into())));
        assert!(query.contains(&("units".into(), "metric".into())));
    }

    #[tokio::test]
    async fn absent_optional_fields_are_not_applicable() {
        let mut body = london();
        let main = body["main"].as_object_mut().unwrap();
        main.remove("sea_level");
        main.remove("grnd_level");
        body["wind"].as_object_mut().unwrap().remove("gust");

        let client = OpenWeatherClient::new(FakeFetch::replying(body));
        let record = client.lookup("London", &key()).await.expect("success");

        assert_eq!(record.atmosphere.sea_level, None);
        assert_eq!(record.atmosphere.ground_level, None);
        assert_eq!(record.wind.gust_mps, None);
    }

    #[tokio::test]
    async fn missing_weather_list_gives_empty_description() {
        let mut body = london();
        body["weather"] = json!([]);

        let client = OpenWeatherClient::new(FakeFetch::replying(body));
        let record = client.lookup("London", &key()).await.expect("success");
        assert_eq!(record.description, "");
    }

    #[tokio::test]
    async fn missing_coord_leaves_coordinates_unset() {
        let mut body = london();
        body.as_object_mut().unwrap().remove("coord");

        let client = OpenWeatherClient::new(FakeFetch::replying(body));
        let record = client.lookup("London", &key()).await.expect("success");
        assert_eq!(record.coordinates, None);
    }

    #[tokio::test]
    async fn not_found_uses_provider_message() {
        let client = OpenWeatherClient::new(FakeFetch::replying(
            json!({ "cod": "404", "message": "city not found" }),
        ));

        let err = client.lookup("Atlantis", &key()).await.unwrap_err();
        assert_eq!(err, LookupError::CityNotFound("city not found".into()));
    }

    #[tokio::test]
    async fn not_found_without_message_uses_default() {
        let client = OpenWeatherClient::new(FakeFetch::replying(json!({ "cod": 404 })));

        let err = client.lookup("Atlantis", &key()).await.unwrap_err();
        assert_eq!(err, LookupError::CityNotFound(DEFAULT_NOT_FOUND.into()));
    }

    #[tokio::test]
    async fn fractional_success_code_is_success() {
        let mut body = london();
        body["cod"] = json!(200.0);

        let client = OpenWeatherClient::new(FakeFetch::replying(body));
        let record = client.lookup("London", &key()).await.expect("success");
        assert_eq!(record.city_name, "London");
    }

    #[tokio::test]
    async fn unreported_visibility_and_country_still_succeed() {
        let mut body = london();
        body.as_object_mut().unwrap().remove("visibility");
        body["sys"].as_object_mut().unwrap().remove("country");

        let client = OpenWeatherClient::new(FakeFetch::replying(body));
        let record = client.lookup("London", &key()).await.expect("success");
        assert_eq!(record.visibility_m, None);
        assert_eq!(record.country_code, None);
    }

    #[tokio::test]
    async fn string_success_code_is_not_success() {
        let mut body = london();
        body["cod"] = json!("200");

        let client = OpenWeatherClient::new(FakeFetch::replying(body));
        let err = client.lookup("London", &key()).await.unwrap_err();
        assert!(matches!(err, LookupError::CityNotFound(_)));
    }

    #[tokio::test]
    async fn unauthorized_is_reported_as_not_found_with_reason() {
        let client = OpenWeatherClient::new(FakeFetch::replying(json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })));

        let err = client.lookup("Paris", &key()).await.unwrap_err();
        assert!(err.user_message().starts_with("Invalid API key"));
    }

    #[tokio::test]
    async fn malformed_success_payload_is_transport_failure() {
        let client = OpenWeatherClient::new(FakeFetch::replying(json!({ "cod": 200, "name": "X" })));

        let err = client.lookup("X", &key()).await.unwrap_err();
        assert_eq!(err, LookupError::TransportFailure);
    }

    #[tokio::test]
    async fn fetch_error_is_transport_failure() {
        let client = OpenWeatherClient::new(FakeFetch::failing("connection refused"));

        let err = client.lookup("Paris", &key()).await.unwrap_err();
        assert_eq!(err, LookupError::TransportFailure);
        assert_eq!(err.user_message(), "Error fetching data");
    }

    #[tokio::test]
    async fn missing_credential_never_fetches() {
        for credential in [Credential::default(), Credential::new("YOUR_API_KEY")] {
            let client = OpenWeatherClient::new(FakeFetch::replying(london()));

            let err = client.lookup("Paris", &credential).await.unwrap_err();
            assert_eq!(err, LookupError::MissingCredential);
            assert_eq!(client.fetch.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn blank_city_never_fetches() {
        let client = OpenWeatherClient::new(FakeFetch::replying(london()));

        let err = client.lookup("   ", &key()).await.unwrap_err();
        assert_eq!(err, LookupError::EmptyInput);
        assert_eq!(client.fetch.call_count(), 0);
    }
}
