#[cfg(test)]
mod tests {
    use crate::booking::BookingOrchestrator;
    use crate::handlers::GcalState;
    use crate::logic::BookingRules;
    use crate::routes::{booking_routes, doctor_routes};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use medibook_common::models::CalendarEvent;
    use medibook_common::services::{CalendarError, MockCalendarService};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(calendar: MockCalendarService) -> Arc<GcalState> {
        Arc::new(GcalState::new(BookingOrchestrator::new(
            Arc::new(calendar),
            BookingRules::default(),
            chrono_tz::Asia::Jerusalem,
        )))
    }

    fn app(calendar: MockCalendarService) -> Router {
        let state = state(calendar);
        booking_routes(state.clone()).merge(doctor_routes(state))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_check_availability_rejects_past_without_calendar_call() {
        let mut calendar = MockCalendarService::new();
        calendar.expect_list_events().never();

        let response = app(calendar)
            .oneshot(post_json(
                "/check_availability",
                json!({ "start": "2020-01-06T10:00:00+02:00", "end": "2020-01-06T10:10:00+02:00" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "available": false, "reason": "Cannot book in the past" })
        );
    }

    fn future_slot() -> Value {
        json!({ "start": "2030-05-13T10:00:00+03:00", "end": "2030-05-13T10:10:00+03:00" })
    }

    #[tokio::test]
    async fn test_check_availability_free_slot() {
        let mut calendar = MockCalendarService::new();
        calendar
            .expect_list_events()
            .times(1)
            .returning(|_| Ok(vec![]));

        let response = app(calendar)
            .oneshot(post_json("/check_availability", future_slot()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({ "available": true }));
    }

    #[tokio::test]
    async fn test_check_availability_taken_slot() {
        let mut calendar = MockCalendarService::new();
        calendar.expect_list_events().times(1).returning(|_| {
            Ok(vec![CalendarEvent {
                id: Some("evt-2".into()),
                ..Default::default()
            }])
        });

        let response = app(calendar)
            .oneshot(post_json("/check_availability", future_slot()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "available": false, "reason": "Time slot already booked" })
        );
    }

    #[tokio::test]
    async fn test_check_availability_provider_error_is_bad_gateway() {
        let mut calendar = MockCalendarService::new();
        calendar.expect_list_events().returning(|_| {
            Err(CalendarError::Provider {
                status: 500,
                body: "backend exploded".into(),
            })
        });

        let response = app(calendar)
            .oneshot(post_json("/check_availability", future_slot()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(read_json(response).await, json!({ "error": "backend exploded" }));
    }

    #[tokio::test]
    async fn test_book_appointment_returns_event_id() {
        let mut calendar = MockCalendarService::new();
        calendar
            .expect_create_event()
            .times(1)
            .withf(|event| event.summary == "Doctor Appointment")
            .returning(|_| Ok("evt-1".to_string()));

        let response = app(calendar)
            .oneshot(post_json(
                "/book_appointment",
                json!({ "start": "2030-05-13T10:00:00+03:00", "end": "2030-05-13T10:10:00+03:00" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "eventId": "evt-1", "status": "booked" })
        );
    }

    #[tokio::test]
    async fn test_book_appointment_malformed_is_bad_request() {
        let mut calendar = MockCalendarService::new();
        calendar.expect_create_event().never();

        let response = app(calendar)
            .oneshot(post_json(
                "/book_appointment",
                json!({ "start": "soon", "end": "later" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_book_appointment_provider_error_is_raw() {
        let mut calendar = MockCalendarService::new();
        calendar.expect_create_event().returning(|_| {
            Err(CalendarError::Provider {
                status: 409,
                body: "duplicate".into(),
            })
        });

        let response = app(calendar)
            .oneshot(post_json(
                "/book_appointment",
                json!({ "start": "2030-05-13T10:00:00+03:00", "end": "2030-05-13T10:10:00+03:00" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(read_json(response).await, json!({ "error": "duplicate" }));
    }

    #[tokio::test]
    async fn test_doctor_appointments_lists_events() {
        let mut calendar = MockCalendarService::new();
        calendar.expect_list_events().times(1).returning(|_| {
            Ok(vec![CalendarEvent {
                id: Some("evt-9".into()),
                summary: Some("Checkup".into()),
                ..Default::default()
            }])
        });

        let response = app(calendar)
            .oneshot(
                Request::builder()
                    .uri("/doctor/appointments")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!([{ "id": "evt-9", "summary": "Checkup" }])
        );
    }

    #[tokio::test]
    async fn test_doctor_appointments_mirrors_provider_status() {
        let mut calendar = MockCalendarService::new();
        calendar.expect_list_events().returning(|_| {
            Err(CalendarError::Provider {
                status: 404,
                body: "Not Found".into(),
            })
        });

        let response = app(calendar)
            .oneshot(
                Request::builder()
                    .uri("/doctor/appointments")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await, json!({ "error": "Not Found" }));
    }
}
