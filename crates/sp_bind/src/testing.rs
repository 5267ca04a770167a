//! Fixture types shared by the unit tests.

use alloc::rc::Rc;
use core::cell::RefCell;
use std::collections::HashMap;

use bytes::Bytes;
use serde_json::Value;
use sp_policy::ConversionPolicy;
use sp_stream::json::{ValueBuilder, emit_value};
use sp_stream::{Event, EventBuffer, StreamError};

use crate::{Bind, Descriptor, EnumKind, FieldConfig, ObjectKind, Outcome, Parser, Registry, Serializer};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Mode {
    #[default]
    Auto,
    Manual,
    Off,
}

impl Bind for Mode {
    fn descriptor() -> Descriptor {
        EnumKind::builder::<Mode>()
            .variant("Auto", Mode::Auto)
            .variant("Manual", Mode::Manual)
            .default(Mode::Auto)
            .finish()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Inner {
    pub level: i32,
    pub label: String,
}

impl Bind for Inner {
    fn descriptor() -> Descriptor {
        ObjectKind::builder::<Inner>()
            .field("level", |i| &i.level, |i| &mut i.level)
            .field("label", |i| &i.label, |i| &mut i.label)
            .constructed()
            .finish()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Settings {
    pub name: String,
    pub volume: u8,
    pub ratio: f64,
    pub enabled: bool,
    pub mode: Mode,
    pub tags: Vec<String>,
    pub limits: HashMap<String, i32>,
    pub inner: Option<Inner>,
    pub blob: Bytes,
}

impl Bind for Settings {
    fn descriptor() -> Descriptor {
        ObjectKind::builder::<Settings>()
            .field("name", |s| &s.name, |s| &mut s.name)
            .field_with(
                "volume",
                |s| &s.volume,
                |s| &mut s.volume,
                FieldConfig::new().int_bounds(0, 100),
            )
            .field("ratio", |s| &s.ratio, |s| &mut s.ratio)
            .field("enabled", |s| &s.enabled, |s| &mut s.enabled)
            .field("mode", |s| &s.mode, |s| &mut s.mode)
            .field("tags", |s| &s.tags, |s| &mut s.tags)
            .field("limits", |s| &s.limits, |s| &mut s.limits)
            .field("inner", |s| &s.inner, |s| &mut s.inner)
            .field("blob", |s| &s.blob, |s| &mut s.blob)
            .constructed()
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Gauge {
    pub level: f32,
    pub peak: f64,
    pub drift: f64,
}

impl Bind for Gauge {
    fn descriptor() -> Descriptor {
        ObjectKind::builder::<Gauge>()
            .field("level", |g| &g.level, |g| &mut g.level)
            .field("peak", |g| &g.peak, |g| &mut g.peak)
            .field("drift", |g| &g.drift, |g| &mut g.drift)
            .constructed()
            .finish()
    }
}

/// A linked node; `next` may point back to an ancestor.
#[derive(Debug, Default)]
pub struct Node {
    pub name: String,
    pub next: Option<Rc<RefCell<Node>>>,
}

impl Bind for Node {
    fn descriptor() -> Descriptor {
        ObjectKind::builder::<Node>()
            .field("name", |n| &n.name, |n| &mut n.name)
            .field("next", |n| &n.next, |n| &mut n.next)
            .constructed()
            .finish()
    }
}

pub fn node(name: &str) -> Rc<RefCell<Node>> {
    Rc::new(RefCell::new(Node {
        name: name.to_owned(),
        next: None,
    }))
}

pub fn to_json<T: Bind>(value: &T, policy: ConversionPolicy) -> Result<Value, StreamError> {
    let registry = Registry::new();
    let mut out = ValueBuilder::new();
    Serializer::new(&registry)
        .with_policy(policy)
        .serialize(value, &mut out)?;
    out.finish()
}

/// Records the events, so non-finite numbers stay visible.
pub fn to_events<T: Bind>(value: &T, policy: ConversionPolicy) -> Result<Vec<Event>, StreamError> {
    let registry = Registry::new();
    let mut out = EventBuffer::new();
    Serializer::new(&registry)
        .with_policy(policy)
        .serialize(value, &mut out)?;
    Ok(out.into_events())
}

pub fn from_json<T: Bind>(json: &Value, policy: ConversionPolicy) -> Outcome<T> {
    let registry = Registry::new();
    let mut parser = Parser::<T>::new(&registry).with_policy(policy);
    emit_value(json, &mut parser).unwrap();
    parser.finish().unwrap()
}

pub fn merge_json<T: Bind>(existing: T, json: &Value, policy: ConversionPolicy) -> Outcome<T> {
    let registry = Registry::new();
    let mut parser = Parser::merge(&registry, existing).with_policy(policy);
    emit_value(json, &mut parser).unwrap();
    parser.finish().unwrap()
}
