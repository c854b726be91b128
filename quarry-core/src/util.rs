use crate::{Error, ErrorContext, Result};
use url::Url;

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Longest prefix of `value` that fits in `max` bytes and ends on a char boundary.
pub fn truncate_str(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::truncate_str(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

/// Connection location decoded from a `<driver>://<location>?<params>` url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUrl {
    /// Percent decoded text between the scheme and the query string.
    pub location: String,
    /// Query string parameters, in order of appearance.
    pub params: Vec<(String, String)>,
}

impl ConnectionUrl {
    /// Check that `url` belongs to the `driver` and split it into location and parameters.
    ///
    /// File based drivers accept locations that are not valid url hosts (`:memory:`,
    /// relative paths), so only the query string goes through [`Url`].
    pub fn parse(driver: &str, url: &str) -> Result<Self> {
        let prefix = format!("{}://", driver);
        let Some(rest) = url.strip_prefix(&prefix) else {
            let error = Error::connection(format!(
                "Expected {} connection url to start with `{}`",
                driver, prefix
            ));
            log::error!("{:#}", error);
            return Err(error);
        };
        let (location, query) = match rest.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (rest, None),
        };
        let location = urlencoding::decode(location)
            .with_context(|| format!("While decoding the connection url `{}`", url))
            .map_err(Error::Connection)?;
        let params = match query {
            Some(query) => Url::parse(&format!("{}?{}", prefix, query))
                .with_context(|| format!("While parsing the parameters of `{}`", url))
                .map_err(Error::Connection)?
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            None => Vec::new(),
        };
        Ok(Self {
            location: location.into_owned(),
            params,
        })
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find_map(|(k, v)| if k == name { Some(v.as_str()) } else { None })
    }

    pub fn is_memory(&self) -> bool {
        self.location.is_empty() || self.location == ":memory:"
    }

    pub fn location_or_memory(&self) -> &str {
        if self.is_memory() {
            ":memory:"
        } else {
            &self.location
        }
    }
}
