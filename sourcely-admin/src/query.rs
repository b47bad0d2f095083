use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 参与管理后台搜索的记录
pub trait Searchable {
    /// 与搜索文本做大小写无关匹配的字段
    fn search_fields(&self) -> Vec<&str>;

    fn matches(&self, needle_lowercase: &str) -> bool {
        self.search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle_lowercase))
    }
}

/// 搜索文本与页码（从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// 先过滤再截取所请求的页
    pub fn apply<T: Searchable + Clone>(&self, items: &[T]) -> Page<T> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let filtered: Vec<&T> = match &needle {
            Some(needle) => items.iter().filter(|item| item.matches(needle)).collect(),
            None => items.iter().collect(),
        };

        let page_size = self.page_size.max(1);
        let page = self.page.max(1);
        let total = filtered.len();
        let total_pages = total.div_ceil(page_size).max(1);

        let items = filtered
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect();

        Page {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 分页前的匹配总数
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}
