use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
    audio::AudioError,
    services::speech_client::types::speech_service_error::SpeechServiceError,
    types::{app_state::AppState, coordinate::ResolvedLocation},
    utils::{answer::Answer, app_error::FinderError, console::Console},
};

const ADDRESS_PROMPT: &str = "Enter your Address: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMethod {
    Speech,
    Typing,
    AutoDetect,
}

impl InputMethod {
    /// Only the bare digits are accepted; `" 1"` or `"01"` are not.
    pub fn parse(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(InputMethod::Speech),
            "2" => Some(InputMethod::Typing),
            "3" => Some(InputMethod::AutoDetect),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
enum RecognitionFailure {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Speech(#[from] SpeechServiceError),
}

/// Asks how the user wants to give their address and turns the answer into
/// a coordinate plus the address text used for directions.
pub async fn acquire_location(
    state: &AppState,
    console: &mut dyn Console,
) -> Result<ResolvedLocation, FinderError> {
    match choose_input_method(console).await? {
        InputMethod::Speech => {
            let address = spoken_address(state, console).await?;
            geocode_address(state, &address).await
        }
        InputMethod::Typing => {
            let address = typed_address(console).await?;
            geocode_address(state, &address).await
        }
        InputMethod::AutoDetect => match detected_location(state, console).await? {
            Some(location) => Ok(location),
            None => {
                let address = typed_address(console).await?;
                geocode_address(state, &address).await
            }
        },
    }
}

async fn choose_input_method(console: &mut dyn Console) -> Result<InputMethod, FinderError> {
    loop {
        console.say("Do you want to input your address by:");
        console.say("\t1. Speech, or");
        console.say("\t2. Typing, or");
        console.say("\t3. Auto detect.");
        console.pause(Duration::from_millis(1400)).await;

        let choice = console.prompt("Your choice (1, 2 or 3): ").await?;
        match InputMethod::parse(&choice) {
            Some(method) => {
                debug!("User choice: {:?}", method);
                return Ok(method);
            }
            None => console.say("\nInput not recognized, please re-enter."),
        }
    }
}

pub async fn typed_address(console: &mut dyn Console) -> Result<String, FinderError> {
    loop {
        let address = console.prompt(ADDRESS_PROMPT).await?;
        let address = address.trim();
        if !address.is_empty() {
            return Ok(address.to_string());
        }
    }
}

async fn listen_and_recognize(
    state: &AppState,
    console: &mut dyn Console,
) -> Result<String, RecognitionFailure> {
    console.say("Currently listening...");
    let clip = state.microphone.listen().await?;
    debug!("Audio captured ({:.1}s)", clip.duration_secs());

    console.say("Analyzing...");
    let transcript = state.speech_service.recognize(&clip).await?;
    debug!("Successfully recognized");

    Ok(transcript)
}

/// Listens until something is recognized or the user stops retrying.
/// `Ok(None)` means the user gave up on speech.
async fn recognize_speech(
    state: &AppState,
    console: &mut dyn Console,
) -> Result<Option<String>, FinderError> {
    loop {
        match listen_and_recognize(state, console).await {
            Ok(transcript) => return Ok(Some(transcript)),
            Err(e) => {
                warn!("Unable to recognize user's speech: {}", e);
                let answer = console
                    .prompt("Unable to recognize speech! Retry? (y/n)")
                    .await?;
                if !Answer::parse(&answer).is_yes() {
                    return Ok(None);
                }
                debug!("Retrying.");
            }
        }
    }
}

async fn spoken_address(
    state: &AppState,
    console: &mut dyn Console,
) -> Result<String, FinderError> {
    let mut address = match recognize_speech(state, console).await? {
        Some(transcript) => transcript,
        None => return typed_address(console).await,
    };

    loop {
        console.say("Detected Address:");
        console.say(&address);

        let answer = console.prompt("Is this your address? (y/n)").await?;
        if Answer::parse(&answer).is_yes() {
            return Ok(address);
        }

        let retry = console.prompt("Retry? (y/n): ").await?;
        if !Answer::parse(&retry).is_yes() {
            let typed = typed_address(console).await?;
            console.say(&format!("Address: {}", typed));
            return Ok(typed);
        }

        address = match recognize_speech(state, console).await? {
            Some(transcript) => transcript,
            None => return typed_address(console).await,
        };
    }
}

/// IP-based guess at the user's address. A confirmed guess keeps the IP
/// coordinate as is; `Ok(None)` sends the caller to typed entry.
async fn detected_location(
    state: &AppState,
    console: &mut dyn Console,
) -> Result<Option<ResolvedLocation>, FinderError> {
    let coordinate = match state.ip_locator.locate().await {
        Ok(coordinate) => coordinate,
        Err(e) => {
            warn!("Unable to locate public IP: {}", e);
            console.say("Unable to detect your location.");
            return Ok(None);
        }
    };

    let address = match state.maps_service.reverse_geocode(coordinate).await {
        Ok(Some(address)) => address,
        Ok(None) => {
            warn!("No address found for {}", coordinate);
            console.say("Unable to detect your location.");
            return Ok(None);
        }
        Err(e) => {
            warn!("Failed to reverse geocode {}: {}", coordinate, e);
            console.say("Unable to detect your location.");
            return Ok(None);
        }
    };

    debug!(
        "Detected user address: {}, coordinate: {}",
        address, coordinate
    );
    console.say(&format!("We have detected your address: {}", address));

    let answer = console.prompt("Is this correct? (y/n):").await?;
    if Answer::parse(&answer).is_yes() {
        Ok(Some(ResolvedLocation {
            coordinate,
            address,
        }))
    } else {
        Ok(None)
    }
}

/// Forward geocodes what the user said or typed. The address text is kept
/// as entered; only the coordinate comes from the lookup.
async fn geocode_address(
    state: &AppState,
    address: &str,
) -> Result<ResolvedLocation, FinderError> {
    let location = state
        .maps_service
        .geocode(address)
        .await
        .map_err(|e| {
            error!("Failed to geocode {}: {}", address, e);
            FinderError::from(e)
        })?
        .ok_or_else(|| {
            error!("Unable to recognize user Address: {}", address);
            FinderError::AddressNotRecognized(address.to_string())
        })?;

    debug!(
        "Input address: {}, coordinate: {}",
        address, location.coordinate
    );

    Ok(ResolvedLocation {
        coordinate: location.coordinate,
        address: address.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use tracing_test::traced_test;

    use super::*;
    use crate::{
        app::{gen_mock_app, mocks},
        audio::AudioClip,
        types::coordinate::Coordinate,
        utils::console::ScriptedConsole,
    };

    fn clip(seed: i16) -> Result<AudioClip, AudioError> {
        Ok(AudioClip::new(vec![seed; 4], 16_000))
    }

    #[test]
    fn only_bare_digits_select_a_method() {
        assert_eq!(InputMethod::parse("1"), Some(InputMethod::Speech));
        assert_eq!(InputMethod::parse("2"), Some(InputMethod::Typing));
        assert_eq!(InputMethod::parse("3"), Some(InputMethod::AutoDetect));

        for input in ["", "0", "4", "01", " 1", "1 ", "one", "-1", "1.0", "²"] {
            assert_eq!(InputMethod::parse(input), None, "{input:?}");
        }
    }

    #[tokio::test]
    async fn test_reprompts_until_valid_choice() {
        let mut mock_app = gen_mock_app(vec![]).await;
        let mut console =
            ScriptedConsole::new(&["", "4", "two", "02", "2", "221B Baker Street"]);

        mocks::geocode_ok(
            &mut mock_app.google_server,
            "221B Baker Street",
            51.5237,
            -0.1585,
        )
        .await;

        acquire_location(mock_app.app.state(), &mut console)
            .await
            .unwrap();

        assert_eq!(console.count("\nInput not recognized, please re-enter."), 4);
        assert_eq!(console.count("Your choice (1, 2 or 3): "), 5);
    }

    #[tokio::test]
    async fn test_typed_address_reprompts_when_empty() {
        let mut mock_app = gen_mock_app(vec![]).await;
        let mut console = ScriptedConsole::new(&["2", "", "   ", "", "221B Baker Street"]);

        let mock = mocks::geocode_ok(
            &mut mock_app.google_server,
            "221B Baker Street",
            51.5237,
            -0.1585,
        )
        .await;

        let location = acquire_location(mock_app.app.state(), &mut console)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(console.count(ADDRESS_PROMPT), 4);
        assert_eq!(location.address, "221B Baker Street");
        assert_eq!(location.coordinate, Coordinate::new(51.5237, -0.1585));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unknown_address_is_fatal() {
        let mut mock_app = gen_mock_app(vec![]).await;
        let mut console = ScriptedConsole::new(&["2", "Nowhere Lane 99"]);

        mocks::geocode_zero(&mut mock_app.google_server).await;

        let err = acquire_location(mock_app.app.state(), &mut console)
            .await
            .unwrap_err();

        assert!(matches!(err, FinderError::AddressNotRecognized(ref a) if a == "Nowhere Lane 99"));
        assert!(logs_contain("Unable to recognize user Address: Nowhere Lane 99"));
    }

    #[tokio::test]
    async fn test_spoken_address_confirmed() {
        let mut mock_app = gen_mock_app(vec![clip(7)]).await;
        let mut console = ScriptedConsole::new(&["1", "y"]);

        let speech =
            mocks::speech_ok(&mut mock_app.google_server, &AudioClip::new(vec![7; 4], 16_000), "221B Baker Street").await;
        mocks::geocode_ok(
            &mut mock_app.google_server,
            "221B Baker Street",
            51.5237,
            -0.1585,
        )
        .await;

        let location = acquire_location(mock_app.app.state(), &mut console)
            .await
            .unwrap();

        speech.assert_async().await;
        assert_eq!(location.address, "221B Baker Street");
        let transcript = console.transcript();
        assert!(transcript.contains("Currently listening...\nAnalyzing...\nDetected Address:\n221B Baker Street"));
        assert_eq!(console.count(ADDRESS_PROMPT), 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_three_failed_recognitions_fall_back_to_typing() {
        let mut mock_app = gen_mock_app(vec![clip(1), clip(2), clip(3)]).await;
        let mut console = ScriptedConsole::new(&["1", "y", "Y", "n", "221B Baker Street"]);

        let speech = mocks::speech_nothing(&mut mock_app.google_server, 3).await;
        mocks::geocode_ok(
            &mut mock_app.google_server,
            "221B Baker Street",
            51.5237,
            -0.1585,
        )
        .await;

        let location = acquire_location(mock_app.app.state(), &mut console)
            .await
            .unwrap();

        speech.assert_async().await;
        assert_eq!(console.count("Unable to recognize speech! Retry? (y/n)"), 3);
        assert_eq!(console.count(ADDRESS_PROMPT), 1);
        assert_eq!(location.address, "221B Baker Street");
        assert!(logs_contain("Unable to recognize user's speech"));
    }

    #[tokio::test]
    async fn test_microphone_failure_counts_as_failed_recognition() {
        let mut mock_app = gen_mock_app(vec![Err(AudioError::Unavailable)]).await;
        let mut console = ScriptedConsole::new(&["1", "n", "221B Baker Street"]);

        let speech = mock_app
            .google_server
            .mock("POST", "/v1/speech:recognize")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        mocks::geocode_ok(
            &mut mock_app.google_server,
            "221B Baker Street",
            51.5237,
            -0.1585,
        )
        .await;

        acquire_location(mock_app.app.state(), &mut console)
            .await
            .unwrap();

        speech.assert_async().await;
        assert_eq!(console.count("Analyzing..."), 0);
        assert_eq!(console.count(ADDRESS_PROMPT), 1);
    }

    #[tokio::test]
    async fn test_rejected_transcript_then_typed() {
        let mut mock_app = gen_mock_app(vec![clip(5)]).await;
        let mut console =
            ScriptedConsole::new(&["1", "n", "no", "221B Baker Street"]);

        mocks::speech_ok(&mut mock_app.google_server, &AudioClip::new(vec![5; 4], 16_000), "two to one bee baker street").await;
        mocks::geocode_ok(
            &mut mock_app.google_server,
            "221B Baker Street",
            51.5237,
            -0.1585,
        )
        .await;

        let location = acquire_location(mock_app.app.state(), &mut console)
            .await
            .unwrap();

        assert_eq!(location.address, "221B Baker Street");
        assert!(console.transcript().contains("Address: 221B Baker Street"));
    }

    #[tokio::test]
    async fn test_rejected_transcript_then_spoken_again() {
        let mut mock_app = gen_mock_app(vec![clip(5), clip(6)]).await;
        let mut console = ScriptedConsole::new(&["1", "what?", "yes", "y"]);

        mocks::speech_ok(&mut mock_app.google_server, &AudioClip::new(vec![5; 4], 16_000), "two to one bee baker street").await;
        mocks::speech_ok(&mut mock_app.google_server, &AudioClip::new(vec![6; 4], 16_000), "221B Baker Street").await;
        mocks::geocode_ok(
            &mut mock_app.google_server,
            "221B Baker Street",
            51.5237,
            -0.1585,
        )
        .await;

        let location = acquire_location(mock_app.app.state(), &mut console)
            .await
            .unwrap();

        assert_eq!(location.address, "221B Baker Street");
        assert_eq!(console.count("Detected Address:"), 2);
        assert_eq!(console.count(ADDRESS_PROMPT), 0);
    }

    #[tokio::test]
    async fn test_confirmed_auto_detect_skips_forward_geocoding() {
        let mut mock_app = gen_mock_app(vec![]).await;
        let mut console = ScriptedConsole::new(&["3", "Yes"]);

        mocks::ip_ok(&mut mock_app.ip_server, "40.7143,-74.0060").await;
        let reverse =
            mocks::reverse_geocode_ok(&mut mock_app.google_server, "City Hall, New York, NY 10007, USA")
                .await;
        let forward = mock_app
            .google_server
            .mock("GET", "/maps/api/geocode/json")
            .match_query(Matcher::Regex("address=".to_string()))
            .expect(0)
            .create_async()
            .await;

        let location = acquire_location(mock_app.app.state(), &mut console)
            .await
            .unwrap();

        reverse.assert_async().await;
        forward.assert_async().await;
        assert_eq!(location.coordinate, Coordinate::new(40.7143, -74.006));
        assert_eq!(location.address, "City Hall, New York, NY 10007, USA");
        assert!(console
            .transcript()
            .contains("We have detected your address: City Hall, New York, NY 10007, USA"));
    }

    #[tokio::test]
    async fn test_rejected_auto_detect_geocodes_typed_address() {
        let mut mock_app = gen_mock_app(vec![]).await;
        let mut console = ScriptedConsole::new(&["3", "n", "221B Baker Street"]);

        mocks::ip_ok(&mut mock_app.ip_server, "40.7143,-74.0060").await;
        mocks::reverse_geocode_ok(&mut mock_app.google_server, "City Hall, New York, NY 10007, USA")
            .await;
        let forward = mocks::geocode_ok(
            &mut mock_app.google_server,
            "221B Baker Street",
            51.5237,
            -0.1585,
        )
        .await;

        let location = acquire_location(mock_app.app.state(), &mut console)
            .await
            .unwrap();

        forward.assert_async().await;
        assert_eq!(location.coordinate, Coordinate::new(51.5237, -0.1585));
        assert_eq!(location.address, "221B Baker Street");
    }

    #[tokio::test]
    async fn test_auto_detect_failure_falls_back_to_typing() {
        let mut mock_app = gen_mock_app(vec![]).await;
        let mut console = ScriptedConsole::new(&["3", "221B Baker Street"]);

        mock_app
            .ip_server
            .mock("GET", "/json")
            .with_status(503)
            .create_async()
            .await;
        mocks::geocode_ok(
            &mut mock_app.google_server,
            "221B Baker Street",
            51.5237,
            -0.1585,
        )
        .await;

        let location = acquire_location(mock_app.app.state(), &mut console)
            .await
            .unwrap();

        assert!(console.transcript().contains("Unable to detect your location."));
        assert_eq!(location.address, "221B Baker Street");
    }
}
