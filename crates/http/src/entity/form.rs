use serde::Serialize;

use crate::media_type::MediaType;
use crate::protocol::EntityError;

/// An `application/x-www-form-urlencoded` body.
///
/// Names keep the order they were first added in; repeated names collect
/// their values in the order added. Encoding `a=1`, `b=2`, `a=3` yields
/// `a=1&a=3&b=2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    fields: Vec<(String, Vec<String>)>,
}

impl FormBody {
    pub fn builder() -> FormBuilder {
        FormBuilder::default()
    }

    /// Builds a form from anything `serde_urlencoded` can serialize, such as
    /// a struct with named fields or a sequence of pairs.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self, EntityError> {
        let encoded = serde_urlencoded::to_string(value).map_err(EntityError::encode)?;
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(&encoded).map_err(EntityError::encode)?;
        Ok(pairs.into_iter().fold(FormBuilder::default(), |builder, (name, value)| builder.add(name, value)).build())
    }

    pub fn content_type() -> MediaType {
        MediaType::form_urlencoded()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// The values of `name`, empty if it was never added.
    pub fn values(&self, name: &str) -> &[String] {
        self.fields.iter().find(|(key, _)| key == name).map(|(_, values)| values.as_slice()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn new_builder(&self) -> FormBuilder {
        FormBuilder { fields: self.fields.clone() }
    }

    /// Percent-encodes the form.
    pub fn encode(&self) -> Result<String, EntityError> {
        let pairs: Vec<(&str, &str)> = self
            .fields
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |value| (name.as_str(), value.as_str())))
            .collect();
        serde_urlencoded::to_string(pairs).map_err(EntityError::encode)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    fields: Vec<(String, Vec<String>)>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.values_mut(name.into()).push(value.into());
        self
    }

    pub fn add_all<N, I>(mut self, name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.values_mut(name.into()).extend(values.into_iter().map(Into::into));
        self
    }

    fn values_mut(&mut self, name: String) -> &mut Vec<String> {
        let index = match self.fields.iter().position(|(key, _)| *key == name) {
            Some(index) => index,
            None => {
                self.fields.push((name, Vec::new()));
                self.fields.len() - 1
            }
        };
        &mut self.fields[index].1
    }

    pub fn build(self) -> FormBody {
        FormBody { fields: self.fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field() {
        let form = FormBody::builder().add("groupId", "com.example").build();
        assert_eq!(form.encode().unwrap(), "groupId=com.example");
    }

    #[test]
    fn test_repeated_name_accumulates() {
        let form = FormBody::builder().add("a", "1").add("a", "2").build();
        assert_eq!(form.encode().unwrap(), "a=1&a=2");

        let form = FormBody::builder().add("a", "1").add("b", "2").add("a", "3").build();
        assert_eq!(form.encode().unwrap(), "a=1&a=3&b=2");
        assert_eq!(form.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(form.values("a"), ["1", "3"]);
        assert!(form.values("c").is_empty());
    }

    #[test]
    fn test_add_all() {
        let form = FormBody::builder().add_all("version", ["1.0", "2.0", "3.0", "4.0"]).build();
        assert_eq!(form.encode().unwrap(), "version=1.0&version=2.0&version=3.0&version=4.0");
    }

    #[test]
    fn test_percent_encoding() {
        let form = FormBody::builder().add("q", "a b&c=d").add("name", "caf\u{e9}").add("safe", "*-._").build();
        assert_eq!(form.encode().unwrap(), "q=a+b%26c%3Dd&name=caf%C3%A9&safe=*-._");
    }

    #[test]
    fn test_empty_form() {
        let form = FormBody::builder().build();
        assert!(form.is_empty());
        assert_eq!(form.encode().unwrap(), "");
    }

    #[test]
    fn test_new_builder() {
        let form = FormBody::builder().add("a", "1").build();
        let derived = form.new_builder().add("a", "2").build();
        assert_eq!(form.encode().unwrap(), "a=1");
        assert_eq!(derived.encode().unwrap(), "a=1&a=2");
    }

    #[test]
    fn test_from_serializable() {
        #[derive(Serialize)]
        struct Artifact<'a> {
            group_id: &'a str,
            version: u32,
        }

        let form = FormBody::from_serializable(&Artifact { group_id: "com.example", version: 3 }).unwrap();
        assert_eq!(form.encode().unwrap(), "group_id=com.example&version=3");
    }
}
