//! # Shapes Example
//!
//! Shows type-aware dispatch over a small declared hierarchy:
//!
//! ```text
//! Circle ──extends──► Shape ──implements──► dyn Area
//! Square ──extends──► Shape
//! ```
//!
//! Listeners are registered for `Shape`, `dyn Area`, `Circle` and `dyn Any`; each
//! dispatched shape reaches every listener its type is assignable to.
//! A scoped "session" listener skips dispatches tagged with any other scope, and a
//! validating listener aborts dispatch of degenerate shapes.
//!
//! ## Run
//! ```bash
//! RUST_LOG=typebus=debug cargo run --example shapes --features logging
//! ```

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;
use typebus::{EventBus, Listener, ListenerError, ListenerFn, LogListener, Scope};

#[derive(Debug)]
struct Shape {
    name: &'static str,
}

#[derive(Debug)]
struct Circle {
    shape: Shape,
    radius: f64,
}

#[derive(Debug)]
struct Square {
    shape: Shape,
    side: f64,
}

trait Area {
    fn area(&self) -> f64;
}

impl Area for Circle {
    fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

impl Area for Square {
    fn area(&self) -> f64 {
        self.side * self.side
    }
}

/// Sums every area it is shown.
struct AreaTotal {
    milli: AtomicU64,
}

impl Listener for AreaTotal {
    type Event = dyn Area;

    fn handle(&self, event: &Self::Event) -> Result<(), ListenerError> {
        let area = event.area();
        if area <= 0.0 {
            return Err(ListenerError::rejected("shape has no area"));
        }
        self.milli.fetch_add((area * 1000.0) as u64, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "area-total"
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let bus = EventBus::builder()
        .extends::<Circle, Shape>(|c| &c.shape)
        .extends::<Square, Shape>(|s| &s.shape)
        .implements::<Circle, dyn Area>(|c| c)
        .implements::<Square, dyn Area>(|s| s)
        .build();

    let total = Arc::new(AreaTotal {
        milli: AtomicU64::new(0),
    });
    let names = ListenerFn::arc("shape-names", |s: &Shape| {
        println!("[shape]   {}", s.name);
        Ok(())
    });
    let circles = ListenerFn::arc("circles", |c: &Circle| {
        println!("[circle]  r={}", c.radius);
        Ok(())
    });
    let everything = ListenerFn::arc("everything", |e: &dyn Any| {
        println!("[any]     is circle: {}", e.is::<Circle>());
        Ok(())
    });
    let session = Scope::new();
    let audit = Arc::new(LogListener::<Circle>::new("session-audit"));

    bus.register(&names);
    bus.register(&total);
    bus.register(&circles);
    bus.register_before(&everything);
    bus.register_scoped(&audit, session);

    println!("-- circle (unscoped)");
    bus.dispatch(&Circle {
        shape: Shape { name: "wheel" },
        radius: 1.0,
    })?;

    println!("-- square (other scope)");
    bus.dispatch_scoped(
        &Square {
            shape: Shape { name: "tile" },
            side: 2.0,
        },
        &Scope::new(),
    )?;

    println!("-- circle (session scope)");
    bus.dispatch_scoped(
        &Circle {
            shape: Shape { name: "coin" },
            radius: 0.5,
        },
        &session,
    )?;

    println!("-- degenerate square");
    let err = bus
        .dispatch(&Square {
            shape: Shape { name: "dot" },
            side: 0.0,
        })
        .err();
    if let Some(err) = err {
        println!("dispatch aborted: {} ({})", err, err.as_label());
    }

    bus.remove_listener(&everything);
    bus.remove_listener_scoped(&audit, &session);

    println!();
    println!("Summary:");
    println!(" ├─► Bindings:     {}", bus.len());
    println!(" ├─► Cached types: {}", bus.cached_types());
    println!(
        " └─► Total area:   {:.3}",
        total.milli.load(Ordering::Relaxed) as f64 / 1000.0
    );
    Ok(())
}
