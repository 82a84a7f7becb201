//! 响应解析服务 - 业务能力层
//!
//! 只负责把一个原始响应体解释为分类结果，不关心网络和持久化。
//!
//! 服务端返回两种 XML：
//!
//! ```text
//! <response><error_code>50</error_code><error>name could not be found</error></response>
//! <response><name_detail>...<usage_full>Biblical</usage_full>...</name_detail></response>
//! ```
//!
//! 来源描述是自由文本，没有布尔字段，所以 biblical 判断只能是
//! 对描述文本做大小写敏感的子串匹配。

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ResponseError;
use crate::models::{FailureKind, LookupResult};

/// biblical 标记
pub const BIBLICAL_MARKER: &str = "Biblical";

const ROOT: &str = "response";

/// 解析后的响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// 服务端返回了来源描述
    Origin { is_biblical: bool },
    /// 服务端返回了错误块
    ServiceError { code: i64, message: Option<String> },
}

/// 解析响应并分类
///
/// 每个名字一个错误边界：任何解析失败都转成 `MalformedResponse`，
/// 按可重试失败处理，不会中断整个运行。
pub fn parse(name: &str, raw: &str) -> LookupResult {
    match parse_payload(raw) {
        Ok(ParsedResponse::Origin { is_biblical }) => LookupResult::success(name, is_biblical),
        Ok(ParsedResponse::ServiceError { code, message }) => {
            LookupResult::service_error(name, code, message)
        }
        Err(e) => LookupResult::transient(name, FailureKind::MalformedResponse, e.to_string()),
    }
}

/// 解析原始 XML
pub fn parse_payload(raw: &str) -> Result<ParsedResponse, ResponseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ResponseError::Empty);
    }

    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut saw_root = false;
    let mut error_code: Option<String> = None;
    let mut error_message: Option<String> = None;
    let mut description = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if stack.is_empty() {
                    if saw_root || tag != ROOT {
                        return Err(ResponseError::MissingRoot);
                    }
                    saw_root = true;
                }
                if is_error_code(&stack, tag.as_bytes()) {
                    error_code.get_or_insert_with(String::new);
                }
                stack.push(tag);
            }
            Ok(Event::Empty(e)) => {
                if stack.is_empty() {
                    if saw_root || e.name().as_ref() != ROOT.as_bytes() {
                        return Err(ResponseError::MissingRoot);
                    }
                    saw_root = true;
                }
                if is_error_code(&stack, e.name().as_ref()) {
                    error_code.get_or_insert_with(String::new);
                }
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| ResponseError::MalformedXml(err.to_string()))?;
                collect_text(&stack, &text, &mut error_code, &mut error_message, &mut description)?;
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                collect_text(&stack, &text, &mut error_code, &mut error_message, &mut description)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ResponseError::MalformedXml(e.to_string())),
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ResponseError::MalformedXml(format!("标签 <{}> 未闭合", open)));
    }
    if !saw_root {
        return Err(ResponseError::MissingRoot);
    }

    match error_code {
        Some(code) => {
            let code = code.trim();
            let code = code
                .parse::<i64>()
                .map_err(|_| ResponseError::InvalidErrorCode(code.to_string()))?;
            Ok(ParsedResponse::ServiceError {
                code,
                message: error_message.map(|m| m.trim().to_string()),
            })
        }
        None => Ok(ParsedResponse::Origin {
            is_biblical: description.contains(BIBLICAL_MARKER),
        }),
    }
}

/// `<error_code>` 出现即视为错误块，不看内容是否为空
fn is_error_code(stack: &[String], tag: &[u8]) -> bool {
    stack.len() == 1 && tag == b"error_code"
}

fn collect_text(
    stack: &[String],
    text: &str,
    error_code: &mut Option<String>,
    error_message: &mut Option<String>,
    description: &mut String,
) -> Result<(), ResponseError> {
    let Some(current) = stack.last() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(ResponseError::MalformedXml("根节点之外存在文本".to_string()));
    };

    // 错误块只认 <response> 的直接子节点
    let direct_child = stack.len() == 2;
    match current.as_str() {
        "error_code" if direct_child => error_code.get_or_insert_with(String::new).push_str(text),
        "error" if direct_child => error_message.get_or_insert_with(String::new).push_str(text),
        _ => {
            description.push_str(text);
            description.push(' ');
        }
    }
    Ok(())
}
