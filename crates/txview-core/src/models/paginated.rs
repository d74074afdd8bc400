use serde::{Deserialize, Serialize};

/// One page of results. `next_page == None` marks the end of the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct PaginatedResponse<T> {
    pub data: T,
    pub next_page: Option<u32>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: T, next_page: Option<u32>) -> Self {
        Self { data, next_page }
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }
}

impl<T> PaginatedResponse<Vec<T>> {
    /// Append a later page in fetch order and take over its cursor.
    pub fn append(&mut self, page: PaginatedResponse<Vec<T>>) {
        self.data.extend(page.data);
        self.next_page = page.next_page;
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order_and_takes_cursor() {
        let mut merged = PaginatedResponse::new(vec![1, 2], Some(1));
        merged.append(PaginatedResponse::new(vec![3, 4], Some(2)));
        merged.append(PaginatedResponse::new(vec![5], None));

        assert_eq!(merged.data, vec![1, 2, 3, 4, 5]);
        assert_eq!(merged.next_page, None);
        assert!(!merged.has_next_page());
        assert_eq!(merged.len(), 5);
    }

    #[test]
    fn test_null_next_page_round_trips() {
        let json = r#"{"data":[],"nextPage":null}"#;
        let page: PaginatedResponse<Vec<u32>> = serde_json::from_str(json).expect("valid page");
        assert!(page.is_empty());
        assert!(!page.has_next_page());

        let value = serde_json::to_value(&page).expect("serializable");
        assert!(value["nextPage"].is_null());
    }
}
