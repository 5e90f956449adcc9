//! Incremental server-sent-events parser.
//!
//! Network chunks split events at arbitrary byte boundaries, so the parser
//! buffers input and only emits events once their terminating blank line has
//! arrived. Pure and synchronous; the client feeds it decoded chunks.

/// One parsed SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Buffering SSE parser. Feed chunks with [`SseParser::push`]; each call
/// returns the events completed by that chunk.
#[derive(Debug, Default)]
pub(crate) struct SseParser {
    buf: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &str) -> Vec<SseEvent> {
        self.buf.push_str(chunk);
        let mut events = Vec::new();

        // An event block ends at a blank line. Normalize CRLF as we scan.
        while let Some(pos) = find_block_end(&self.buf) {
            let block: String = self.buf.drain(..pos.end).collect();
            if let Some(event) = parse_block(&block[..pos.body]) {
                events.push(event);
            }
        }
        events
    }
}

struct BlockEnd {
    /// Length of the block body (without the blank-line terminator).
    body: usize,
    /// Total bytes to drain including the terminator.
    end: usize,
}

fn find_block_end(buf: &str) -> Option<BlockEnd> {
    let lf = buf.find("\n\n").map(|i| BlockEnd { body: i, end: i + 2 });
    let crlf = buf
        .find("\r\n\r\n")
        .map(|i| BlockEnd { body: i, end: i + 4 });
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.body <= b.body { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn parse_block(block: &str) -> Option<SseEvent> {
    let mut event = String::new();
    let mut data_lines: Vec<&str> = Vec::new();

    for line in block.lines() {
        if let Some(value) = line.strip_prefix("event:") {
            event = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("data:") {
            data_lines.push(value.strip_prefix(' ').unwrap_or(value));
        }
        // Comments (":...") and unknown fields are ignored.
    }

    if event.is_empty() && data_lines.is_empty() {
        return None;
    }
    Some(SseEvent {
        event,
        data: data_lines.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_event_in_one_chunk() {
        let mut parser = SseParser::new();
        let events = parser.push("event:conversation.message.delta\ndata:{\"a\":1}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "conversation.message.delta");
        assert_eq!(events[0].data, "{\"a\":1}");
    }

    #[test]
    fn event_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push("event:conversation.mess").is_empty());
        assert!(parser.push("age.delta\ndata:{\"content\":\"你").is_empty());
        let events = parser.push("好\"}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"content\":\"你好\"}");
    }

    #[test]
    fn multiple_events_in_one_chunk() {
        let mut parser = SseParser::new();
        let events = parser.push("event:a\ndata:1\n\nevent:b\ndata:2\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, "a");
        assert_eq!(events[1].event, "b");
    }

    #[test]
    fn crlf_terminators_are_handled() {
        let mut parser = SseParser::new();
        let events = parser.push("event:done\r\ndata:x\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "done");
    }

    #[test]
    fn data_space_after_colon_is_stripped() {
        let mut parser = SseParser::new();
        let events = parser.push("data: hello\n\n");
        assert_eq!(events[0].data, "hello");
    }

    #[test]
    fn multiline_data_joins_with_newline() {
        let mut parser = SseParser::new();
        let events = parser.push("data:line1\ndata:line2\n\n");
        assert_eq!(events[0].data, "line1\nline2");
    }

    #[test]
    fn comment_only_block_is_skipped() {
        let mut parser = SseParser::new();
        assert!(parser.push(": keep-alive\n\n").is_empty());
    }

    #[test]
    fn incomplete_tail_stays_buffered() {
        let mut parser = SseParser::new();
        assert!(parser.push("event:a\ndata:1\n").is_empty());
        let events = parser.push("\n");
        assert_eq!(events.len(), 1);
    }
}
