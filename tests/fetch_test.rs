use anyhow::Result;
use httpmock::prelude::*;
use robotevents_cli::endpoints::{lookup, PathParams};
use robotevents_cli::render::{Renderer, Shape};
use robotevents_cli::ui::{plan_request, Selections};
use robotevents_cli::{Error, Request, RobotEventsClient};
use serde_json::json;

fn client(server: &MockServer) -> RobotEventsClient {
    RobotEventsClient::new(server.url("/api/v2"), Some("test-token")).unwrap()
}

#[test]
fn fetch_sends_bearer_token_and_returns_json() -> Result<()> {
    let server = MockServer::start();
    let team_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v2/teams/171256")
            .header("authorization", "Bearer test-token")
            .header("accept", "application/json");
        then.status(200).json_body(json!({
            "id": 171256,
            "number": "1234X",
            "team_name": "Bulldogs"
        }));
    });

    let req = Request::new(lookup("team")?).path_param("id", 171256);
    let value = client(&server).fetch_request(&req)?.expect("a response");

    team_mock.assert();
    assert_eq!(value["number"], "1234X");
    Ok(())
}

#[test]
fn team_id_alias_reaches_the_server() -> Result<()> {
    let server = MockServer::start();
    let events_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v2/teams/171256/events");
        then.status(200).json_body(json!({"data": []}));
    });

    let mut params = PathParams::new();
    params.insert("team_id".to_string(), "171256".to_string());
    let value = client(&server).fetch(lookup("team_events")?, &params, &[])?;

    events_mock.assert();
    assert_eq!(value, Some(json!({"data": []})));
    Ok(())
}

#[test]
fn planned_team_events_request_carries_query_filters() -> Result<()> {
    let server = MockServer::start();
    let events_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v2/teams/171256/events")
            .query_param("per_page", "10")
            .query_param("season", "181");
        then.status(200).json_body(json!({
            "meta": {"current_page": 1, "last_page": 1, "total": 2, "per_page": 10},
            "data": [
                {"id": 1, "name": "Signature Event"},
                {"id": 2, "name": "Regional"}
            ]
        }));
    });

    let selections = Selections {
        team: Some(171256),
        season: Some(181),
        ..Selections::default()
    };
    let req = plan_request(lookup("team_events")?, &selections);
    let value = client(&server).fetch_request(&req)?.expect("a response");
    events_mock.assert();

    let mut out = Vec::new();
    let shape = Renderer::plain(80).render(&mut out, "Team Events", &value)?;
    assert!(matches!(shape, Shape::Table(rows) if rows.len() == 2));
    let text = String::from_utf8(out)?;
    assert!(text.contains("Signature Event"));
    assert!(text.contains("Page 1 of 1 (2 total)"));
    Ok(())
}

#[test]
fn non_success_status_is_an_error() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/events/999");
        then.status(404).body("Not Found");
    });

    let req = Request::new(lookup("event")?).path_param("id", 999);
    let err = client(&server).fetch_request(&req).unwrap_err();

    assert!(err.is_status());
    match err {
        Error::Status { status, url, body } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/api/v2/events/999"));
            assert_eq!(body, "Not Found");
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn unauthorized_is_not_silently_empty() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/seasons");
        then.status(401).json_body(json!({"message": "Unauthenticated."}));
    });

    let result = client(&server).fetch_request(&Request::new(lookup("seasons")?));
    assert!(matches!(result, Err(Error::Status { status: 401, .. })));
    Ok(())
}

#[test]
fn invalid_json_body_is_a_decode_error() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/programs");
        then.status(200).body("<html>maintenance</html>");
    });

    let result = client(&server).fetch_request(&Request::new(lookup("programs")?));
    assert!(matches!(result, Err(Error::Decode { .. })));
    Ok(())
}

#[test]
fn missing_path_parameter_never_hits_the_network() -> Result<()> {
    let server = MockServer::start();
    let any_mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(json!({}));
    });

    let req = Request::new(lookup("event_division_matches")?).path_param("id", 5);
    let err = client(&server).fetch_request(&req).unwrap_err();

    assert!(matches!(err, Error::MissingParameter { ref parameter, .. } if parameter == "div"));
    any_mock.assert_hits(0);
    Ok(())
}

#[test]
fn request_without_token_omits_authorization() -> Result<()> {
    let server = MockServer::start();
    let open_mock = server.mock(|when, then| {
        when.method(GET).path("/programs").header_missing("authorization");
        then.status(200).json_body(json!({"data": [{"id": 1, "abbr": "V5RC"}]}));
    });

    let anonymous = RobotEventsClient::new(server.base_url(), None)?;
    let value = anonymous.fetch_request(&Request::new(lookup("programs")?))?;

    open_mock.assert();
    assert!(value.is_some());
    Ok(())
}

#[test]
fn network_failure_yields_no_result() -> Result<()> {
    // Nothing listens on port 1.
    let unreachable = RobotEventsClient::new("http://127.0.0.1:1/api/v2", Some("t"))?;
    let value = unreachable.fetch_request(&Request::new(lookup("teams")?))?;
    assert!(value.is_none());
    Ok(())
}
