use std::collections::HashMap;

/// Raw value → record ids, iterated in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueIndex {
    order: Vec<String>,
    ids: HashMap<String, Vec<String>>,
}

impl ValueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: &str, id: &str) {
        match self.ids.get_mut(value) {
            Some(ids) => ids.push(id.to_string()),
            None => {
                self.order.push(value.to_string());
                self.ids.insert(value.to_string(), vec![id.to_string()]);
            }
        }
    }

    pub fn get(&self, value: &str) -> Option<&[String]> {
        self.ids.get(value).map(Vec::as_slice)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.ids.contains_key(value)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order
            .iter()
            .map(|value| (value.as_str(), self.ids[value].as_slice()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ValueIndex {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (value, id) in iter {
            index.insert(value, id);
        }
        index
    }
}
