// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use prizenation_client::{ApiClient, CartState, ClientError, Session, SessionStore};
use prizenation_core::ClientConfig;
use prizenation_model::{CartItem, CompetitionId, PaymentMethod, TicketNumber, User};
use prizenation_storefront::{CompetitionForm, MediaKind};
use tempfile::tempdir;
use tiny_http::{Header, Response, Server};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    url: String,
    auth: Option<String>,
    body: String,
}

struct FakeBackend {
    base: String,
    log: Arc<Mutex<Vec<Recorded>>>,
    _handle: JoinHandle<()>,
}

impl FakeBackend {
    fn spawn<F>(route: F) -> Self
    where
        F: Fn(&str, &str, &str) -> (u16, String) + Send + 'static,
    {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let base = format!("http://{}", server.server_addr());
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = Arc::clone(&log);
        let handle = thread::spawn(move || loop {
            let mut req = match server.recv_timeout(Duration::from_millis(2000)) {
                Ok(Some(req)) => req,
                Ok(None) | Err(_) => break,
            };
            let mut body = String::new();
            let _ = req.as_reader().read_to_string(&mut body);
            let method = req.method().to_string();
            let url = req.url().to_string();
            let auth = req
                .headers()
                .iter()
                .find(|h| h.field.equiv("Authorization"))
                .map(|h| h.value.as_str().to_string());
            log_clone.lock().expect("log").push(Recorded {
                method: method.clone(),
                url: url.clone(),
                auth,
                body: body.clone(),
            });
            let (status, payload) = route(&method, &url, &body);
            let _ = req.respond(
                Response::from_string(payload)
                    .with_status_code(status)
                    .with_header(
                        Header::from_bytes("Content-Type", "application/json")
                            .expect("content type"),
                    ),
            );
        });
        Self {
            base,
            log,
            _handle: handle,
        }
    }

    fn client(&self) -> ApiClient {
        ApiClient::new(ClientConfig {
            api_url: self.base.clone(),
            timeout_secs: 5,
            log_json: false,
        })
        .expect("client")
    }

    fn requests(&self) -> Vec<Recorded> {
        self.log.lock().expect("log").clone()
    }

    fn lines(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.url))
            .collect()
    }
}

const USER_JSON: &str = r#"{"id":"u-1","email":"amy@example.com","name":"Amy","site_credit_balance":100.0,"cash_balance":0.0,"is_admin":false}"#;

fn cart_json(items: &str, discount: f64, code: &str) -> String {
    format!(r#"{{"items":[{items}],"discount":{discount},"coupon_code":"{code}"}}"#)
}

fn item(id: &str, quantity: u32) -> CartItem {
    CartItem {
        competition_id: CompetitionId::new(id).expect("id"),
        title: "Prize".to_string(),
        price: 2.0,
        quantity,
        image: String::new(),
    }
}

fn competition_id(raw: &str) -> CompetitionId {
    CompetitionId::new(raw).expect("id")
}

#[test]
fn login_persists_token_and_attaches_it_to_later_requests() {
    let backend = FakeBackend::spawn(|method, url, _| match (method, url) {
        ("POST", "/api/auth/login") => (
            200,
            format!(r#"{{"access_token":"tok-123","token_type":"bearer","user":{USER_JSON}}}"#),
        ),
        ("GET", "/api/cart") => (200, cart_json("", 0.0, "")),
        _ => (404, r#"{"detail":"Not Found"}"#.to_string()),
    });
    let dir = tempdir().expect("tempdir");
    let store = SessionStore::new(dir.path().join("session.json"));
    let mut api = backend.client();
    let mut session = Session::open(store.clone()).expect("session");

    let user = session
        .login(&mut api, "amy@example.com", "pw")
        .expect("login")
        .clone();
    assert_eq!(user.name, "Amy");
    assert!(store.load().expect("load").is_some());

    let mut cart = CartState::new();
    cart.refresh(&api).expect("cart");

    let reqs = backend.requests();
    assert_eq!(reqs[0].auth, None);
    assert!(reqs[0].body.contains("\"email\":\"amy@example.com\""));
    assert_eq!(reqs[1].auth.as_deref(), Some("Bearer tok-123"));

    // A fresh process picks the token back up.
    let reopened = Session::open(store).expect("reopen");
    assert_eq!(reopened.token(), Some("tok-123"));
    assert_eq!(reopened.user().map(|u| u.email.as_str()), Some("amy@example.com"));
}

#[test]
fn cart_mutations_refetch_but_clear_does_not() {
    let backend = FakeBackend::spawn(|method, url, _| match (method, url) {
        ("GET", "/api/cart") => (
            200,
            cart_json(
                r#"{"competition_id":"c-1","title":"Prize","price":2.0,"quantity":30,"image":""}"#,
                0.0,
                "",
            ),
        ),
        ("POST", "/api/cart/add") => (200, r#"{"message":"Item added to cart"}"#.to_string()),
        ("POST", "/api/cart/update") => (200, r#"{"message":"Cart updated"}"#.to_string()),
        ("DELETE", "/api/cart/clear") => (200, r#"{"message":"Cart cleared"}"#.to_string()),
        _ => (404, "{}".to_string()),
    });
    let api = backend.client().with_token(Some("t".to_string()));
    let mut cart = CartState::new();

    cart.add(&api, &item("c-1", 30)).expect("add");
    let totals = cart.totals();
    assert!((totals.subtotal - 60.0).abs() < 1e-9);
    assert!((totals.total - 60.0).abs() < 1e-9);
    assert_eq!(cart.item_count(), 30);

    cart.update(&api, &competition_id("c-1"), 0).expect("update");
    cart.clear(&api).expect("clear");
    assert!(cart.cart().is_empty());

    assert_eq!(
        backend.lines(),
        vec![
            "POST /api/cart/add",
            "GET /api/cart",
            "POST /api/cart/update",
            "GET /api/cart",
            "DELETE /api/cart/clear",
        ]
    );
    let update = &backend.requests()[2];
    assert_eq!(update.body, r#"{"competition_id":"c-1","quantity":0}"#);
}

#[test]
fn coupon_goes_in_query_and_server_detail_is_surfaced() {
    let backend = FakeBackend::spawn(|method, url, _| match (method, url) {
        ("POST", "/api/cart/apply-coupon?code=SAVE10") => (
            200,
            r#"{"message":"Coupon applied","discount":10.0}"#.to_string(),
        ),
        ("POST", _) => (400, r#"{"detail":"Coupon has expired"}"#.to_string()),
        ("GET", "/api/cart") => (200, cart_json("", 10.0, "SAVE10")),
        _ => (404, "{}".to_string()),
    });
    let api = backend.client().with_token(Some("t".to_string()));

    let mut cart = CartState::new();
    cart.apply_coupon(&api, "SAVE10").expect("coupon");
    assert_eq!(cart.cart().coupon_code, "SAVE10");

    let mut fresh = CartState::new();
    let err = fresh.apply_coupon(&api, "OLD").expect_err("expired");
    assert_eq!(err.user_message("Invalid coupon code"), "Coupon has expired");
    assert_eq!(err.status(), Some(400));

    // Second coupon on the same cart is refused locally.
    let before = backend.requests().len();
    assert!(matches!(
        cart.apply_coupon(&api, "MORE"),
        Err(ClientError::Validation(_))
    ));
    assert_eq!(backend.requests().len(), before);
}

#[test]
fn invalid_competition_form_never_reaches_the_server() {
    let backend = FakeBackend::spawn(|_, _, _| (200, "{}".to_string()));
    let api = backend.client().with_token(Some("admin".to_string()));

    let form = CompetitionForm {
        title: "Car".to_string(),
        subtitle: "Fast".to_string(),
        description: "Red".to_string(),
        price: "0.001".to_string(),
        max_tickets: "0".to_string(),
        ..CompetitionForm::default()
    };
    let err = api.save_competition(None, &form).expect_err("invalid");
    match err {
        ClientError::Validation(errors) => {
            assert_eq!(errors.get("price"), Some("Price must be at least £0.01"));
            assert_eq!(errors.get("max_tickets"), Some("Max tickets must be at least 1"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let blank = CompetitionForm::default();
    assert!(api
        .save_competition(Some(&competition_id("c-1")), &blank)
        .is_err());
    assert!(backend.requests().is_empty());
}

#[test]
fn valid_form_creates_then_updates() {
    let backend = FakeBackend::spawn(|method, _, body| match method {
        "POST" => (200, body.replacen('{', r#"{"id":"new-1","#, 1)),
        "PUT" => (200, r#"{"message":"Competition updated successfully"}"#.to_string()),
        _ => (404, "{}".to_string()),
    });
    let api = backend.client().with_token(Some("admin".to_string()));
    let form = CompetitionForm {
        title: "Car".to_string(),
        subtitle: "Fast".to_string(),
        description: "Red".to_string(),
        price: "1.50".to_string(),
        max_tickets: "999".to_string(),
        ..CompetitionForm::default()
    };
    let created = api
        .save_competition(None, &form)
        .expect("create")
        .expect("created competition");
    assert_eq!(created.id.as_str(), "new-1");
    assert_eq!(created.price, 1.5);
    assert!(api
        .save_competition(Some(&created.id), &form)
        .expect("update")
        .is_none());

    let reqs = backend.requests();
    assert_eq!(reqs[0].url, "/api/competitions");
    assert!(reqs[0].body.contains(r#""sale_price":null"#));
    assert!(reqs[0].body.contains(r#""prize_value":"0""#));
    assert_eq!(reqs[1].method, "PUT");
    assert_eq!(reqs[1].url, "/api/competitions/new-1");
}

#[test]
fn winner_lookup_posts_a_bare_integer() {
    let backend = FakeBackend::spawn(|_, url, body| {
        if url.ends_with("/find-winner") && body == "42" {
            (
                200,
                r#"{"found":true,"winner":{"name":"Amy","email":"amy@example.com","purchase_date":"2025-01-02T10:00:00","order_id":"ord-123456789012345"}}"#.to_string(),
            )
        } else if url.ends_with("/mark-winner") {
            (200, r#"{"message":"Winner marked"}"#.to_string())
        } else {
            (200, r#"{"found":false}"#.to_string())
        }
    });
    let api = backend.client().with_token(Some("admin".to_string()));
    let id = competition_id("c-7");
    let lookup = api.find_winner(&id, TicketNumber(42)).expect("lookup");
    assert!(lookup.found);
    assert_eq!(lookup.winner.expect("winner").name, "Amy");
    assert!(!api.find_winner(&id, TicketNumber(7)).expect("miss").found);
    api.mark_winner(&id, TicketNumber(42)).expect("mark");

    let reqs = backend.requests();
    assert_eq!(reqs[0].url, "/api/admin/competitions/c-7/find-winner");
    assert_eq!(reqs[2].url, "/api/admin/competitions/c-7/mark-winner");
    assert_eq!(reqs[2].body, "42");
}

#[test]
fn protected_calls_without_a_token_send_nothing() {
    let backend = FakeBackend::spawn(|_, _, _| (200, "[]".to_string()));
    let api = backend.client();
    assert!(matches!(api.orders(), Err(ClientError::Unauthenticated)));
    assert!(matches!(api.cart(), Err(ClientError::Unauthenticated)));
    assert!(api.competitions(Some("vip")).expect("public").is_empty());
    assert_eq!(backend.lines(), vec!["GET /api/competitions?tag=vip"]);
}

#[test]
fn checkout_blocks_on_balance_and_clears_after_card_payment() {
    let backend = FakeBackend::spawn(|method, url, _| match (method, url) {
        ("GET", "/api/cart") => (
            200,
            cart_json(
                r#"{"competition_id":"c-1","title":"Prize","price":2.0,"quantity":30}"#,
                0.0,
                "",
            ),
        ),
        ("POST", "/api/checkout/complete") => (
            200,
            r#"{"success":true,"order_id":"o-9","order_number":1009,"payment_method":"card","tickets":[],"total":60.0,"redirect_url":"/payment/card?order_id=o-9"}"#.to_string(),
        ),
        ("DELETE", "/api/cart/clear") => (200, r#"{"message":"Cart cleared"}"#.to_string()),
        _ => (404, "{}".to_string()),
    });
    let api = backend.client().with_token(Some("t".to_string()));
    let poor = User {
        email: "p@example.com".to_string(),
        site_credit_balance: 10.0,
        ..User::default()
    };
    let mut cart = CartState::new();
    cart.refresh(&api).expect("cart");

    let err = cart
        .checkout(&api, Some(&poor), PaymentMethod::SiteCredit)
        .expect_err("insufficient");
    assert_eq!(err.user_message("Checkout failed"), "Insufficient Balance");
    assert_eq!(backend.requests().len(), 1);

    let resp = cart
        .checkout(&api, Some(&poor), PaymentMethod::Card)
        .expect("card checkout");
    assert!(resp.requires_redirect());
    assert!(cart.cart().is_empty());
    let reqs = backend.requests();
    assert_eq!(reqs[1].body, r#"{"payment_method":"card"}"#);
    assert_eq!(
        backend.lines()[1..],
        ["POST /api/checkout/complete", "DELETE /api/cart/clear"]
    );
}

#[test]
fn rejected_token_ends_the_session_and_logout_resets_cart() {
    let backend = FakeBackend::spawn(|_, url, _| match url {
        "/api/auth/me" => (401, r#"{"detail":"Invalid token"}"#.to_string()),
        _ => (200, cart_json("", 0.0, "")),
    });
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    fs::write(&path, r#"{"token":"stale","user":null}"#).expect("seed session");
    let store = SessionStore::new(path.clone());
    let mut api = backend.client();
    let mut session = Session::open(store).expect("session");
    assert!(session.is_authenticated());

    assert!(matches!(
        session.refresh(&mut api),
        Err(ClientError::Unauthenticated)
    ));
    assert!(!session.is_authenticated());
    assert!(!path.exists());
    assert_eq!(api.token(), None);

    let mut cart = CartState::new();
    api.set_token(Some("x".to_string()));
    cart.refresh(&api).expect("cart");
    session.logout(&mut api, &mut cart).expect("logout");
    assert!(cart.cart().is_empty());
    assert_eq!(api.token(), None);
}

#[test]
fn upload_sends_multipart_and_returns_absolute_url() {
    let backend = FakeBackend::spawn(|_, _, body| {
        if body.contains("name=\"file\"") && body.contains("fake-mp4-bytes") {
            (200, r#"{"url":"/uploads/1700000000.mp4"}"#.to_string())
        } else {
            (400, r#"{"detail":"no file"}"#.to_string())
        }
    });
    let dir = tempdir().expect("tempdir");
    let video = dir.path().join("teaser.mp4");
    fs::write(&video, b"fake-mp4-bytes").expect("write");
    let api = backend.client().with_token(Some("admin".to_string()));

    let (kind, url) = api.upload(&video).expect("upload");
    assert_eq!(kind, MediaKind::Video);
    assert_eq!(url, format!("{}/uploads/1700000000.mp4", backend.base));
    assert_eq!(backend.lines(), vec!["POST /api/upload"]);
}
