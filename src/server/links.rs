//! Hyperlink decoration of catalog entities in responses.

use crate::catalog_store::{Album, Artist, Track};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize, Debug)]
pub struct Linked<T> {
    #[serde(flatten)]
    pub entity: T,
    pub links: BTreeMap<&'static str, String>,
}

pub trait Linkable: Serialize + Sized {
    fn links(&self, base_url: &str) -> BTreeMap<&'static str, String>;

    fn linked(self, base_url: &str) -> Linked<Self> {
        let links = self.links(base_url);
        Linked {
            entity: self,
            links,
        }
    }
}

impl Linkable for Artist {
    fn links(&self, base_url: &str) -> BTreeMap<&'static str, String> {
        let me = format!("{}/artists/{}", base_url, self.id);
        BTreeMap::from([
            ("albums", format!("{}/albums", me)),
            ("tracks", format!("{}/tracks", me)),
            ("self", me),
        ])
    }
}

impl Linkable for Album {
    fn links(&self, base_url: &str) -> BTreeMap<&'static str, String> {
        let me = format!("{}/albums/{}", base_url, self.id);
        BTreeMap::from([
            ("artist", format!("{}/artists/{}", base_url, self.artist_id)),
            ("tracks", format!("{}/tracks", me)),
            ("self", me),
        ])
    }
}

impl Linkable for Track {
    fn links(&self, base_url: &str) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("artist", format!("{}/artists/{}", base_url, self.artist_id)),
            ("album", format!("{}/albums/{}", base_url, self.album_id)),
            ("self", format!("{}/tracks/{}", base_url, self.id)),
        ])
    }
}

pub fn linked_all<T: Linkable>(items: Vec<T>, base_url: &str) -> Vec<Linked<T>> {
    items.into_iter().map(|item| item.linked(base_url)).collect()
}
