//! Integration tests for session carts under concurrent access.

use std::num::NonZeroU32;
use std::thread;

use cart::{CartLineItem, CartService, ProductId, SessionStore, SessionToken, TokenIssuer};

fn token(s: &str) -> SessionToken {
    SessionToken::parse(s).unwrap()
}

fn qty(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

#[test]
fn test_checkout_returns_items_in_call_order() {
    let service = CartService::new(SessionStore::new());
    let t = token("tok1");

    for i in 1..=5u32 {
        service.add_to_cart(&t, ProductId::from(u64::from(i)), qty(i));
    }

    let items = service.checkout(Some(&t));
    let expected: Vec<_> = (1..=5u32)
        .map(|i| CartLineItem::new(ProductId::from(u64::from(i)), qty(i)))
        .collect();
    assert_eq!(items, expected);
    assert!(service.checkout(Some(&t)).is_empty());
}

#[test]
fn test_view_grows_monotonically_between_adds() {
    let service = CartService::default();
    let t = token("tok1");

    let mut previous = service.view_cart(Some(&t));
    assert!(previous.is_empty());

    for i in 0..10 {
        service.add_to_cart(&t, "p1".into(), qty(1));
        let current = service.view_cart(Some(&t));
        let again = service.view_cart(Some(&t));
        assert_eq!(current, again);
        assert_eq!(current.len(), i + 1);
        assert_eq!(&current[..previous.len()], previous.as_slice());
        previous = current;
    }
}

#[test]
fn test_never_used_token_is_empty() {
    let service = CartService::default();
    let t = token("ghost");

    assert!(service.view_cart(Some(&t)).is_empty());
    assert!(service.checkout(Some(&t)).is_empty());
    assert_eq!(service.store().active_sessions(), 0);
}

#[test]
fn test_sessions_are_isolated() {
    let service = CartService::default();
    let a = token("tok-a");
    let b = token("tok-b");

    service.add_to_cart(&a, "p1".into(), qty(1));
    service.add_to_cart(&b, "p2".into(), qty(2));
    service.add_to_cart(&b, "p3".into(), qty(3));

    assert_eq!(service.view_cart(Some(&a)), vec![CartLineItem::new("p1", qty(1))]);

    assert_eq!(service.checkout(Some(&b)).len(), 2);
    assert_eq!(service.view_cart(Some(&a)).len(), 1);
    assert!(service.store().contains(&a));
}

#[test]
fn test_concurrent_adds_on_distinct_tokens() {
    let service = CartService::default();
    let sessions = 32;
    let adds_per_session = 50;

    thread::scope(|s| {
        for n in 0..sessions {
            let service = &service;
            s.spawn(move || {
                let t = token(&format!("tok-{n}"));
                for _ in 0..adds_per_session {
                    service.add_to_cart(&t, "p1".into(), qty(1));
                }
            });
        }
    });

    assert_eq!(service.store().active_sessions(), sessions);
    for n in 0..sessions {
        let t = token(&format!("tok-{n}"));
        assert_eq!(service.view_cart(Some(&t)).len(), adds_per_session);
    }
}

#[test]
fn test_concurrent_adds_and_checkouts_lose_nothing() {
    let service = CartService::default();
    let t = token("shared");
    let writers = 8;
    let adds_per_writer = 200;

    let drained: Vec<CartLineItem> = thread::scope(|s| {
        for w in 0..writers {
            let service = &service;
            let t = &t;
            s.spawn(move || {
                for i in 0..adds_per_writer {
                    service.add_to_cart(t, format!("w{w}-{i}").into(), qty(1));
                }
            });
        }

        let checkout = s.spawn(|| {
            let mut drained = Vec::new();
            for _ in 0..100 {
                drained.extend(service.checkout(Some(&t)));
                thread::yield_now();
            }
            drained
        });
        checkout.join().unwrap()
    });

    let mut all = drained;
    all.extend(service.checkout(Some(&t)));
    assert_eq!(all.len(), writers * adds_per_writer);

    // Each writer's items keep their relative order across checkouts.
    for w in 0..writers {
        let prefix = format!("w{w}-");
        let seq: Vec<usize> = all
            .iter()
            .filter_map(|item| item.product_id.as_str().strip_prefix(&prefix))
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(seq, (0..adds_per_writer).collect::<Vec<_>>());
    }
}

#[test]
fn test_snapshots_are_never_torn() {
    let service = CartService::default();
    let t = token("tok1");

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..1_000 {
                service.add_to_cart(&t, "p1".into(), qty(7));
            }
        });
        s.spawn(|| {
            let mut last = 0;
            for _ in 0..1_000 {
                let items = service.view_cart(Some(&t));
                assert!(items.len() >= last);
                assert!(items.iter().all(|i| i.quantity.get() == 7));
                last = items.len();
            }
        });
    });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_login_then_shop_across_tasks() {
    let issuer = TokenIssuer::new();
    let service = CartService::default();

    let mut handles = Vec::new();
    for user in 0..16 {
        let token = issuer
            .issue(&format!("user{user}@example.com"), "password123")
            .unwrap();
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.add_to_cart(&token, "1".into(), qty(1));
            service.add_to_cart(&token, "4".into(), qty(2));
            service.checkout(Some(&token))
        }));
    }

    for handle in handles {
        let items = handle.await.unwrap();
        assert_eq!(
            items,
            vec![CartLineItem::new("1", qty(1)), CartLineItem::new("4", qty(2))]
        );
    }
    assert_eq!(service.store().active_sessions(), 0);
}
