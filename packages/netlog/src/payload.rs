use core::fmt;

use crate::{buffer::Snapshot, event::EventRecord};

/// Envelope around the batch of event objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{"events":[...]}`
    Wrapped,
    /// `[...]`, as taken by the collector's bulk endpoint.
    BareArray,
}

impl PayloadShape {
    const fn open(self) -> &'static str {
        match self {
            Self::Wrapped => "{\"events\":[",
            Self::BareArray => "[",
        }
    }

    const fn close(self) -> &'static str {
        match self {
            Self::Wrapped => "]}",
            Self::BareArray => "]",
        }
    }
}

/// One delivery batch built over a log snapshot. Records are already JSON, so
/// the body is streamed as string chunks without a second serialization pass.
#[derive(Clone, Copy, Debug)]
pub struct BatchPayload<'a> {
    records: Snapshot<'a>,
    shape: PayloadShape,
}

impl<'a> BatchPayload<'a> {
    pub fn new(records: Snapshot<'a>, shape: PayloadShape) -> Self {
        Self { records, shape }
    }

    pub fn event_count(&self) -> usize {
        self.records.len()
    }

    pub fn content_length(&self) -> usize {
        let count = self.records.len();
        let records: usize = self.records.iter().map(EventRecord::len).sum();
        let separators = count.saturating_sub(1);
        self.shape.open().len() + records + separators + self.shape.close().len()
    }

    pub fn chunks(&self) -> Chunks<'a> {
        Chunks {
            records: self.records,
            shape: self.shape,
            stage: Stage::Open,
        }
    }

    pub fn write_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for chunk in self.chunks() {
            out.write_str(chunk)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
enum Stage {
    Open,
    Record(usize),
    Separator(usize),
    Close,
    Done,
}

/// Body pieces in wire order.
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    records: Snapshot<'a>,
    shape: PayloadShape,
    stage: Stage,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let count = self.records.len();
        let after_record = |index: usize| {
            if index + 1 < count {
                Stage::Separator(index + 1)
            } else {
                Stage::Close
            }
        };

        match self.stage {
            Stage::Open => {
                self.stage = if count > 0 {
                    Stage::Record(0)
                } else {
                    Stage::Close
                };
                Some(self.shape.open())
            }
            Stage::Record(index) => {
                self.stage = after_record(index);
                match self.records.get(index) {
                    Some(record) => Some(record.as_str()),
                    None => {
                        self.stage = Stage::Close;
                        self.next()
                    }
                }
            }
            Stage::Separator(index) => {
                self.stage = Stage::Record(index);
                Some(",")
            }
            Stage::Close => {
                self.stage = Stage::Done;
                Some(self.shape.close())
            }
            Stage::Done => None,
        }
    }
}
