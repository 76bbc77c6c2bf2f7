//! End-to-end controller tests against a local mock control API
//!
//! These tests drive `RemoteToggleController` through the real HTTP client
//! and check the state/status/LED outcomes for the documented scenarios.

use std::net::TcpListener;
use std::time::Duration;

use mockito::{Matcher, Server, ServerGuard};
use rstest::rstest;
use sonos_remote::{
    ControllerStatus, DeviceEndpointSet, HttpClient, HttpError, HttpResponse, LedSignal,
    PlaybackState, RecordingIndicator, RemoteToggleController, Transport,
};

const STATE_PATH: &str = "/kitchen/state";
const PLAY_PATH: &str = "/kitchen/tunein/play/34804";
const PAUSE_PATH: &str = "/kitchen/pause";

fn endpoints_for(server: &ServerGuard) -> DeviceEndpointSet {
    let host_with_port = server.host_with_port();
    let (host, port) = host_with_port
        .rsplit_once(':')
        .expect("mock server address has a port");
    DeviceEndpointSet::new(
        host,
        port.parse().unwrap(),
        STATE_PATH,
        PLAY_PATH,
        PAUSE_PATH,
        "KQED-FM",
    )
    .unwrap()
}

fn http_controller(
    server: &ServerGuard,
) -> RemoteToggleController<HttpClient, RecordingIndicator> {
    RemoteToggleController::new(
        endpoints_for(server),
        HttpClient::with_timeout(Duration::from_secs(2)),
        RecordingIndicator::new(),
    )
}

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Real HTTP client that sends pause requests to a port nobody listens on
struct PauseRefused {
    client: HttpClient,
    base: String,
    dead_base: String,
}

impl Transport for PauseRefused {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError> {
        if url.ends_with(PAUSE_PATH) {
            let redirected = url.replacen(&self.base, &self.dead_base, 1);
            self.client.get(&redirected)
        } else {
            self.client.get(url)
        }
    }
}

#[test]
fn test_paused_query_then_toggle_plays() {
    let mut server = Server::new();
    let state_mock = server
        .mock("GET", STATE_PATH)
        .with_status(200)
        .with_body("PAUSED")
        .expect(1)
        .create();
    let play_mock = server
        .mock("GET", PLAY_PATH)
        .with_status(200)
        .with_body(r#"{"status":"success"}"#)
        .expect(1)
        .create();
    let pause_mock = server.mock("GET", PAUSE_PATH).expect(0).create();

    let mut controller = http_controller(&server);
    assert_eq!(controller.state(), PlaybackState::Unknown);

    assert_eq!(
        controller.query_state(),
        (PlaybackState::Paused, ControllerStatus::Ok)
    );
    assert_eq!(controller.toggle_playback(), ControllerStatus::Ok);
    assert_eq!(controller.state(), PlaybackState::Playing);

    state_mock.assert();
    play_mock.assert();
    pause_mock.assert();
}

#[test]
fn test_playing_query_then_toggle_pauses() {
    let mut server = Server::new();
    let _state_mock = server
        .mock("GET", STATE_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"currentTrack":{"stationName":"KQED-FM"},"playbackState":"PLAYING"}"#)
        .create();
    let pause_mock = server
        .mock("GET", PAUSE_PATH)
        .with_status(200)
        .with_body(r#"{"status":"success"}"#)
        .expect(1)
        .create();
    let play_mock = server.mock("GET", PLAY_PATH).expect(0).create();

    let mut controller = http_controller(&server);
    assert_eq!(controller.query_state().1, ControllerStatus::Ok);
    assert_eq!(controller.toggle_playback(), ControllerStatus::Ok);
    assert_eq!(controller.state(), PlaybackState::Paused);

    pause_mock.assert();
    play_mock.assert();
}

#[test]
fn test_pause_connection_refused_keeps_playing_and_blinks() {
    let mut server = Server::new();
    let _state_mock = server
        .mock("GET", STATE_PATH)
        .with_status(200)
        .with_body("PLAYING")
        .create();

    let endpoints = endpoints_for(&server);
    let transport = PauseRefused {
        client: HttpClient::with_timeout(Duration::from_secs(2)),
        base: endpoints.base_url(),
        dead_base: format!("http://127.0.0.1:{}", closed_port()),
    };
    let mut controller =
        RemoteToggleController::new(endpoints, transport, RecordingIndicator::new());

    assert_eq!(
        controller.query_state(),
        (PlaybackState::Playing, ControllerStatus::Ok)
    );

    let led = controller.on_button_press();
    assert_eq!(controller.last_status(), Some(ControllerStatus::ConnectionFailed));
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(led, LedSignal::Blink);
}

#[test]
fn test_query_is_idempotent_without_server_change() {
    let mut server = Server::new();
    let state_mock = server
        .mock("GET", STATE_PATH)
        .with_status(200)
        .with_body(r#"{"playbackState":"PAUSED_PLAYBACK"}"#)
        .expect(2)
        .create();

    let mut controller = http_controller(&server);
    let first = controller.query_state();
    let second = controller.query_state();

    assert_eq!(first, second);
    assert_eq!(first, (PlaybackState::Paused, ControllerStatus::Ok));
    state_mock.assert();
}

#[rstest]
#[case(200, "TRANSITIONING")]
#[case(200, "<html><body>It works!</body></html>")]
#[case(200, r#"{"volume":12}"#)]
#[case(404, "Not Found")]
#[case(500, r#"{"status":"error","error":"Got status 500"}"#)]
fn test_ambiguous_state_response_keeps_state(#[case] status: usize, #[case] body: &str) {
    let mut server = Server::new();
    let first = server
        .mock("GET", STATE_PATH)
        .with_status(200)
        .with_body("PLAYING")
        .expect(1)
        .create();

    let mut controller = http_controller(&server);
    assert_eq!(controller.query_state().0, PlaybackState::Playing);
    first.assert();
    first.remove();

    let _second = server
        .mock("GET", STATE_PATH)
        .with_status(status)
        .with_body(body)
        .create();

    assert_eq!(
        controller.query_state(),
        (PlaybackState::Playing, ControllerStatus::UnexpectedResponse)
    );
}

#[test]
fn test_unknown_state_press_queries_then_plays() {
    let mut server = Server::new();
    let state_mock = server
        .mock("GET", STATE_PATH)
        .with_status(200)
        .with_body(r#"{"playbackState":"STOPPED"}"#)
        .expect(1)
        .create();
    let play_mock = server
        .mock("GET", PLAY_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status":"success"}"#)
        .expect(1)
        .create();

    let mut controller = http_controller(&server);
    assert_eq!(controller.on_button_press(), LedSignal::Solid);
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.requests_issued(), 2);

    state_mock.assert();
    play_mock.assert();
}

#[test]
fn test_unreachable_server_turns_led_off_after_threshold() {
    let endpoints = DeviceEndpointSet::new(
        "127.0.0.1",
        closed_port(),
        STATE_PATH,
        PLAY_PATH,
        PAUSE_PATH,
        "KQED-FM",
    )
    .unwrap();
    let mut controller = RemoteToggleController::new(
        endpoints,
        HttpClient::with_timeout(Duration::from_secs(2)),
        RecordingIndicator::new(),
    );

    let signals: Vec<_> = (0..4).map(|_| controller.on_button_press()).collect();

    assert_eq!(
        signals,
        vec![LedSignal::Blink, LedSignal::Blink, LedSignal::Off, LedSignal::Off]
    );
    assert_eq!(controller.state(), PlaybackState::Unknown);
    assert_eq!(controller.requests_issued(), 4);
}
