//! In-memory [`Transport`] for tests: canned replies per URL, optional per-URL delay, and a
//! log of every request made.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{
    json,
    Value,
};

use super::transport::{
    QueryPairs,
    Transport,
};
use crate::core::FetchError;

pub const FAKE_BASE: &str = "http://fake.test/api";

#[derive(Clone)]
struct FakeReply {
    result: Result<Value, FetchError>,
    delay: Duration,
}

#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, FakeReply>>,
    calls: Mutex<Vec<String>>,
}

pub fn route_key(url: &str, query: &QueryPairs) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{}?{}", url, pairs.join("&"))
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, route: impl Into<String>, body: Value) {
        self.respond_after(route, body, Duration::ZERO);
    }

    pub fn respond_after(&self, route: impl Into<String>, body: Value, delay: Duration) {
        self.routes.lock().unwrap().insert(route.into(), FakeReply { result: Ok(body), delay });
    }

    pub fn fail(&self, route: impl Into<String>, status: u16) {
        self.fail_after(route, status, Duration::ZERO);
    }

    pub fn fail_after(&self, route: impl Into<String>, status: u16, delay: Duration) {
        let route = route.into();
        let error = FetchError::Http { url: route.clone(), status };
        self.routes.lock().unwrap().insert(route, FakeReply { result: Err(error), delay });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, route: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == route).count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get_json(&self, url: &str, query: &QueryPairs) -> Result<Value, FetchError> {
        let route = route_key(url, query);
        self.calls.lock().unwrap().push(route.clone());

        let reply = self.routes.lock().unwrap().get(&route).cloned();
        let Some(reply) = reply else {
            return Err(FetchError::Http { url: route, status: 404 });
        };

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

pub fn character_url(id: u32) -> String {
    format!("{FAKE_BASE}/character/{id}")
}

pub fn character_json(id: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Character {id}"),
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": { "name": "Earth (C-137)", "url": format!("{FAKE_BASE}/location/1") },
        "location": { "name": "Citadel of Ricks", "url": format!("{FAKE_BASE}/location/3") },
        "image": format!("{FAKE_BASE}/character/avatar/{id}.jpeg"),
        "episode": [format!("{FAKE_BASE}/episode/1")],
        "url": character_url(id),
        "created": "2017-11-04T18:48:46.250Z"
    })
}

pub fn location_json(id: u32, residents: &[u32]) -> Value {
    json!({
        "id": id,
        "name": format!("Location {id}"),
        "type": "Planet",
        "dimension": "Dimension C-137",
        "residents": residents.iter().map(|r| character_url(*r)).collect::<Vec<_>>(),
        "url": format!("{FAKE_BASE}/location/{id}"),
        "created": "2017-11-10T12:42:04.162Z"
    })
}

pub fn episode_json(id: u32, characters: &[u32]) -> Value {
    json!({
        "id": id,
        "name": format!("Episode {id}"),
        "air_date": "December 2, 2013",
        "episode": format!("S01E{id:02}"),
        "characters": characters.iter().map(|c| character_url(*c)).collect::<Vec<_>>(),
        "url": format!("{FAKE_BASE}/episode/{id}"),
        "created": "2017-11-10T12:56:33.798Z"
    })
}

pub fn page_json(path: &str, page: u32, pages: u32, results: Vec<Value>) -> Value {
    let link = |p: u32| format!("{FAKE_BASE}/{path}?page={p}");
    json!({
        "info": {
            "count": pages * 20,
            "pages": pages,
            "next": if page < pages { Some(link(page + 1)) } else { None },
            "prev": if page > 1 && page <= pages + 1 { Some(link(page - 1)) } else { None },
        },
        "results": results,
    })
}
