use reqwest::StatusCode;

use super::*;

const URL: &str = "https://letterboxd.com/film/heat-1995/";

#[test]
fn test_status_error_success_is_none() {
    assert!(status_error(StatusCode::OK, URL).is_none());
}

#[test]
fn test_status_error_404_is_not_found() {
    let err = status_error(StatusCode::NOT_FOUND, URL).unwrap();
    assert!(matches!(err, ScrapeError::NotFound { ref url } if url == URL));
    assert!(err.is_not_found());
    assert!(!err.is_transient());
}

#[test]
fn test_status_error_server_and_throttle_are_transient() {
    for code in [
        StatusCode::TOO_MANY_REQUESTS,
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::SERVICE_UNAVAILABLE,
    ] {
        let err = status_error(code, URL).unwrap();
        assert!(
            matches!(err, ScrapeError::ServerError { status, .. } if status == code.as_u16()),
            "{code}"
        );
        assert!(err.is_transient(), "{code}");
        assert!(!err.is_not_found(), "{code}");
    }
}

#[test]
fn test_status_error_other_client_errors_are_permanent() {
    let err = status_error(StatusCode::FORBIDDEN, URL).unwrap();
    assert!(matches!(err, ScrapeError::ServerError { status: 403, .. }));
    assert!(!err.is_transient());
    assert!(!err.is_not_found());
}

#[test]
fn test_markup_error_is_not_found_and_permanent() {
    let err = ScrapeError::markup("no film data");
    assert!(err.is_not_found());
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_unbuildable_request_is_permanent() {
    let fetcher = HttpFetcher::new(DEFAULT_TIMEOUT).unwrap();
    let err = fetcher.fetch("not a url").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Http(_)));
    assert!(!err.is_transient());
    assert!(!err.is_not_found());
}
