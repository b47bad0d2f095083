use serde_json::Value;

use super::I18nError;
use crate::lang::Lang;

/// 单个语言的语言包树
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    lang: Lang,
    tree: Value,
}

impl Dictionary {
    pub fn parse(lang: Lang, json: &str) -> Result<Self, I18nError> {
        let tree = serde_json::from_str(json).map_err(|source| I18nError::Parse { lang, source })?;
        Self::from_value(lang, tree)
    }

    /// 根节点必须是对象
    pub fn from_value(lang: Lang, tree: Value) -> Result<Self, I18nError> {
        if !tree.is_object() {
            return Err(I18nError::NotAnObject(lang));
        }
        Ok(Self { lang, tree })
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// 按点号路径查找，数组元素用下标（`items.0`）
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut node = &self.tree;
        for segment in path.split('.') {
            node = match node {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// 所有非对象节点的点号路径，按文档顺序
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_leaves(&self.tree, &mut String::new(), &mut out);
        out
    }
}

fn collect_leaves(node: &Value, prefix: &mut String, out: &mut Vec<String>) {
    let Value::Object(map) = node else {
        out.push(prefix.clone());
        return;
    };
    for (key, child) in map {
        let len = prefix.len();
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(key);
        collect_leaves(child, prefix, out);
        prefix.truncate(len);
    }
}
