#[derive(Debug, PartialEq)]
pub(crate) enum TemplatePart<'a> {
    Static(&'a str),
    Placeholder(&'a str),
}

/// 按 `{name}` 切分文案；未闭合的 `{` 之后的内容按普通文本处理
pub(crate) fn parse_template(mut input: &str) -> Vec<TemplatePart<'_>> {
    let mut parts = Vec::new();
    while let Some(start) = input.find('{') {
        if start > 0 {
            parts.push(TemplatePart::Static(&input[..start]));
        }
        input = &input[start + 1..];
        match input.find('}') {
            Some(end) => {
                parts.push(TemplatePart::Placeholder(&input[..end]));
                input = &input[end + 1..];
            }
            None => break,
        }
    }
    if !input.is_empty() {
        parts.push(TemplatePart::Static(input));
    }
    parts
}

/// 用 `args` 填充占位符，未提供的占位符替换为空串
pub(crate) fn render(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len() + 16);
    for part in parse_template(template) {
        match part {
            TemplatePart::Static(s) => result.push_str(s),
            TemplatePart::Placeholder(name) => {
                let val = args
                    .iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| *v)
                    .unwrap_or("");
                result.push_str(val);
            }
        }
    }
    result
}
