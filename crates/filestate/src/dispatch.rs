//! Event dispatcher: routes one event to one resource store operation.

use std::io::{Read, Write};
use std::str::FromStr;

use filestate_config::HandlerConfig;
use strum::{Display, EnumString};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{debug, info, warn};

use crate::codec::{self, Attributes, Response};
use crate::errors::HandlerError;
use crate::store::ResourceStore;

/// Attribute injected by `create` to record when the resource was made.
pub const CREATED_KEY: &str = "@created";

/// Operations understood by the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Event {
    /// Allocate a new record from the request body.
    Create,
    /// Return the stored attributes of a record.
    Read,
    /// Replace the stored attributes of a record.
    Update,
    /// Remove a record.
    Delete,
    /// Report whether a record exists.
    Exists,
}

impl Event {
    /// Parses an event name exactly as passed on the command line.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::UnrecognizedEvent`] for any other name.
    pub fn parse(raw: &str) -> Result<Self, HandlerError> {
        Self::from_str(raw).map_err(|_| HandlerError::UnrecognizedEvent {
            event: raw.to_owned(),
        })
    }

    /// Reports whether the event consumes a request body.
    pub const fn reads_body(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

/// Source of wall-clock time for creation timestamps.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> OffsetDateTime;
}

/// Clock backed by the system time, in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Formats a creation timestamp as `DD/MM/YYYY hh:mm:ss`.
///
/// # Errors
///
/// Returns [`HandlerError::Timestamp`] if the time cannot be formatted.
pub fn format_created(at: OffsetDateTime) -> Result<String, HandlerError> {
    at.format(format_description!(
        "[day]/[month]/[year] [hour]:[minute]:[second]"
    ))
    .map_err(HandlerError::Timestamp)
}

/// Executes handler events against a resource store.
pub struct Dispatcher<'a, S, C = SystemClock> {
    config: &'a HandlerConfig,
    store: &'a S,
    clock: C,
}

impl<'a, S: ResourceStore> Dispatcher<'a, S> {
    /// Creates a dispatcher that timestamps with the system clock.
    pub const fn new(config: &'a HandlerConfig, store: &'a S) -> Self {
        Self {
            config,
            store,
            clock: SystemClock,
        }
    }
}

impl<'a, S: ResourceStore, C: Clock> Dispatcher<'a, S, C> {
    /// Replaces the clock used for creation timestamps.
    pub fn with_clock<D: Clock>(self, clock: D) -> Dispatcher<'a, S, D> {
        Dispatcher {
            config: self.config,
            store: self.store,
            clock,
        }
    }

    /// Runs `event` and writes its single-line response to `stdout`.
    ///
    /// The response is fully encoded before anything is written, so a failed
    /// operation leaves `stdout` untouched.
    ///
    /// # Errors
    ///
    /// Returns the first failure raised by the payload, the store or the
    /// output stream.
    pub fn dispatch(
        &self,
        event: Event,
        stdin: &mut impl Read,
        stdout: &mut impl Write,
    ) -> Result<(), HandlerError> {
        let response = self.execute(event, stdin)?;
        response.write_to(stdout).map_err(HandlerError::WriteOutput)
    }

    /// Runs `event` and returns its response without writing it.
    ///
    /// `stdin` is handed on only when [`Event::reads_body`] holds.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub fn execute(&self, event: Event, stdin: &mut impl Read) -> Result<Response, HandlerError> {
        debug!(target: "filestate::dispatch", %event, "dispatching event");
        let body = event.reads_body().then_some(stdin);
        match event {
            Event::Exists => Ok(self.exists()),
            Event::Create => self.create(body),
            Event::Read => self.read(),
            Event::Update => self.update(body),
            Event::Delete => self.delete(),
        }
    }

    fn exists(&self) -> Response {
        let exists = self
            .config
            .identifier()
            .is_some_and(|identifier| self.store.exists(identifier));
        debug!(target: "filestate::dispatch", exists, "checked existence");
        Response::Exists(exists)
    }

    fn create(&self, body: Option<&mut impl Read>) -> Result<Response, HandlerError> {
        let mut attributes = read_payload(body)?;
        let created = format_created(self.clock.now())?;
        attributes.insert(CREATED_KEY.to_owned(), serde_json::Value::String(created));

        let identifier = self.store.allocate(self.config.script())?;
        if let Err(error) = self
            .store
            .write(&identifier, &codec::encode_attributes(&attributes))
        {
            if let Err(cleanup) = self.store.remove(&identifier) {
                warn!(
                    target: "filestate::dispatch",
                    identifier = %identifier,
                    error = %cleanup,
                    "failed to remove unwritten backing file"
                );
            }
            return Err(error.into());
        }

        info!(target: "filestate::dispatch", identifier = %identifier, "created resource");
        attributes.insert(
            self.config.id_key().to_owned(),
            serde_json::Value::String(identifier),
        );
        Ok(Response::Attributes(attributes))
    }

    fn read(&self) -> Result<Response, HandlerError> {
        let identifier = self.identifier()?;
        let bytes = self.store.read_all(identifier)?;
        let attributes =
            codec::decode_stored(&bytes).map_err(|source| HandlerError::MalformedRecord {
                identifier: identifier.to_owned(),
                source,
            })?;
        Ok(Response::Attributes(attributes))
    }

    fn update(&self, body: Option<&mut impl Read>) -> Result<Response, HandlerError> {
        let identifier = self.identifier()?;
        if !self.store.exists(identifier) {
            return Err(HandlerError::NotFound {
                identifier: identifier.to_owned(),
            });
        }

        let attributes = read_payload(body)?;
        self.store
            .write(identifier, &codec::encode_attributes(&attributes))?;
        info!(target: "filestate::dispatch", identifier, "updated resource");
        Ok(Response::Attributes(attributes))
    }

    fn delete(&self) -> Result<Response, HandlerError> {
        let identifier = self.identifier()?;
        self.store.remove(identifier)?;
        info!(target: "filestate::dispatch", identifier, "deleted resource");
        Ok(Response::empty())
    }

    fn identifier(&self) -> Result<&'a str, HandlerError> {
        self.config
            .identifier()
            .ok_or_else(|| HandlerError::MissingIdentifier {
                key: self.config.id_key().to_owned(),
            })
    }
}

/// Decodes the request body; an event without one sees an empty object.
fn read_payload(body: Option<&mut impl Read>) -> Result<Attributes, HandlerError> {
    let Some(stdin) = body else {
        return Ok(Attributes::new());
    };
    let mut bytes = Vec::new();
    stdin
        .read_to_end(&mut bytes)
        .map_err(HandlerError::ReadInput)?;
    codec::decode(&bytes).map_err(HandlerError::MalformedPayload)
}
