//! Client façade
//!
//! Owns the connection, enforces single-flight request/response, and
//! layers typed opcode wrappers and configuration bootstrap over the raw
//! exchange.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::snapshot::{
    ConfigurableOpcodeTables, DeviceSnapshot, HistoryDefinition, HistoryPointConfiguration,
    HistorySegmentConfiguration, IoDefinition, IoPointDefinition, OpcodeTableEntry,
};
use crate::transport::Transport;
use chrono::NaiveDateTime;
use rocproto::enums::{
    HistoryArchiveType, HistoryAveragingRateType, HistoryType, IoLocationKind,
};
use rocproto::frame;
use rocproto::history::{DailyHistoryIndex, HistoryTagPeriodIndex, SinglePointHistory};
use rocproto::logs::{AlarmData, EventData};
use rocproto::system::SystemConfig;
use rocproto::{RequestBody, ResponseBody};
use rocwire::TlpTriple;
use roctlp::registry::{
    history_segment_point_configuration, ANALOG_INPUTS, CONFIGURABLE_OPCODE,
    HISTORY_SEGMENT_CONFIGURATION,
};
use roctlp::{TlpInstance, TlpValue};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex as StdMutex;
use tokio::sync::Mutex;

/// Number of history segments on a ROC800.
const HISTORY_SEGMENT_COUNT: u8 = 13;
/// Number of configurable opcode tables.
const OPCODE_TABLE_COUNT: u8 = 16;
/// Data slots per configurable opcode table.
const OPCODE_TABLE_SLOTS: u8 = 44;

pub struct RocClient {
    config: ClientConfig,
    addr: std::net::SocketAddr,
    transport: Mutex<Transport>,
    in_flight: AtomicBool,
    snapshot: StdMutex<DeviceSnapshot>,
}

/// Clears the single-flight flag on every exit path.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RocClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let addr = config.socket_addr()?;
        Ok(Self {
            config,
            addr,
            transport: Mutex::new(Transport::default()),
            in_flight: AtomicBool::new(false),
            snapshot: StdMutex::new(DeviceSnapshot::default()),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn state(&self) -> std::sync::MutexGuard<'_, DeviceSnapshot> {
        self.snapshot.lock().expect("snapshot lock poisoned")
    }

    /// Copy of everything learned about the device so far.
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.state().clone()
    }

    /// Open the connection. A no-op when already open.
    pub async fn open(&self) -> Result<()> {
        self.transport
            .lock()
            .await
            .open(self.addr, self.config.connect_timeout)
            .await
    }

    /// Close the connection. A no-op when already closed.
    pub async fn close(&self) {
        self.transport
            .lock()
            .await
            .close(self.config.close_timeout)
            .await;
    }

    pub async fn is_open(&self) -> bool {
        self.transport.lock().await.is_open()
    }

    /// Run `body` with the connection open, closing it on every return
    /// path. The closure conventionally captures the client:
    ///
    /// ```no_run
    /// # async fn demo(client: rocclient::RocClient) -> rocclient::Result<()> {
    /// let time = client
    ///     .with_connection(|| async { client.get_clock_time().await })
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub async fn with_connection<F, Fut, T>(&self, body: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.open().await?;
        let result = body().await;
        self.close().await;
        result
    }

    /// Send one opcode request and decode its response.
    ///
    /// Exactly one exchange may be active per client; a second concurrent
    /// call fails with [`ClientError::Busy`] before writing anything.
    /// Connects on demand if the connection is closed.
    pub async fn exchange(&self, request: RequestBody) -> Result<ResponseBody> {
        let _guard = self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map(|_| FlightGuard(&self.in_flight))
            .map_err(|_| ClientError::Busy)?;

        let mut transport = self.transport.lock().await;
        transport.open(self.addr, self.config.connect_timeout).await?;

        let opcode = request.opcode();
        let frame = frame::encode_request(self.config.device_address(), &request)?;
        tracing::debug!(opcode, len = frame.len(), "sending request");

        if let Err(e) = transport.write_frame(&frame, self.config.write_timeout).await {
            transport.abort();
            return Err(e);
        }
        let raw = match transport.read_frame(self.config.read_timeout).await {
            Ok(raw) => raw,
            Err(e) => {
                transport.abort();
                return Err(e);
            }
        };

        let (_, body) = match frame::decode_response(&raw, &request) {
            Ok(decoded) => decoded,
            Err(e) => {
                let e = ClientError::from(e);
                if e.closes_connection() {
                    transport.abort();
                }
                return Err(e);
            }
        };
        drop(transport);

        tracing::debug!(opcode = body.opcode(), "response decoded");
        match body {
            ResponseBody::Error(errors) => Err(ClientError::Device(errors)),
            ResponseBody::Empty { opcode } => Err(ClientError::EmptyResponse(opcode)),
            body if body.opcode() != opcode => Err(ClientError::UnexpectedResponse {
                got: body.opcode(),
                expected: opcode,
            }),
            body => Ok(body),
        }
    }

    // ---- typed opcode wrappers -------------------------------------

    /// Read one TLP (opcode 180).
    pub async fn read_tlp(&self, tlp: TlpInstance) -> Result<TlpValue> {
        let mut values = self.read_tlps(vec![tlp]).await?;
        values
            .pop()
            .ok_or_else(|| ClientError::Data("opcode 180 returned no values".into()))
    }

    /// Read one TLP by its numbers (opcode 180).
    pub async fn read_tlp_numbers(
        &self,
        point_type: u8,
        logical_number: u8,
        parameter: u8,
    ) -> Result<TlpValue> {
        self.read_tlp(TlpInstance::new(point_type, logical_number, parameter))
            .await
    }

    /// Read a list of TLPs (opcode 180), tag-enriched when the I/O map is
    /// fully defined.
    pub async fn read_tlps(&self, tlps: Vec<TlpInstance>) -> Result<Vec<TlpValue>> {
        let response = self.exchange(RequestBody::Parameters { tlps }).await?;
        let ResponseBody::Parameters(data) = response else {
            return Err(ClientError::Data("opcode 180 returned foreign body".into()));
        };
        Ok(self.named_values(data.values))
    }

    /// Read `count` contiguous parameters of one point (opcode 167).
    pub async fn read_contiguous_tlps(
        &self,
        point_type: u8,
        logical_number: u8,
        count: u8,
        starting_parameter: u8,
    ) -> Result<Vec<TlpValue>> {
        let response = self
            .exchange(RequestBody::SinglePointParameters {
                point_type,
                logical_number,
                count,
                starting_parameter,
            })
            .await?;
        let ResponseBody::PointParameters(data) = response else {
            return Err(ClientError::Data("opcode 167 returned foreign body".into()));
        };
        Ok(self.named_values(data.values))
    }

    /// Opcode 6. The result is also cached in the snapshot.
    pub async fn get_system_config(&self) -> Result<SystemConfig> {
        let response = self.exchange(RequestBody::SystemConfig).await?;
        let ResponseBody::SystemConfig(config) = response else {
            return Err(ClientError::Data("opcode 6 returned foreign body".into()));
        };
        self.state().system_config = Some(config.clone());
        Ok(config)
    }

    /// Opcode 7.
    pub async fn get_clock_time(&self) -> Result<NaiveDateTime> {
        let response = self.exchange(RequestBody::ReadClock).await?;
        let ResponseBody::ClockTime(clock) = response else {
            return Err(ClientError::Data("opcode 7 returned foreign body".into()));
        };
        Ok(clock.datetime()?)
    }

    /// Opcode 118.
    pub async fn read_alarms(&self, count: u8, start_index: i16) -> Result<AlarmData> {
        let response = self
            .exchange(RequestBody::AlarmData { count, start_index })
            .await?;
        let ResponseBody::AlarmData(data) = response else {
            return Err(ClientError::Data("opcode 118 returned foreign body".into()));
        };
        Ok(data)
    }

    /// Opcode 119.
    pub async fn read_events(&self, count: u8, start_index: i16) -> Result<EventData> {
        let response = self
            .exchange(RequestBody::EventData { count, start_index })
            .await?;
        let ResponseBody::EventData(data) = response else {
            return Err(ClientError::Data("opcode 119 returned foreign body".into()));
        };
        Ok(data)
    }

    /// Opcode 108.
    pub async fn read_history_tag_and_index(
        &self,
        segment: u8,
        points: Vec<u8>,
    ) -> Result<HistoryTagPeriodIndex> {
        let response = self
            .exchange(RequestBody::HistoryTagPeriodIndex { segment, points })
            .await?;
        let ResponseBody::HistoryTagPeriodIndex(data) = response else {
            return Err(ClientError::Data("opcode 108 returned foreign body".into()));
        };
        Ok(data)
    }

    /// Opcode 135.
    pub async fn read_single_point_history(
        &self,
        segment: u8,
        point: u8,
        history_type: HistoryType,
        start_index: i16,
        count: u8,
    ) -> Result<SinglePointHistory> {
        let response = self
            .exchange(RequestBody::SinglePointHistory {
                segment,
                point,
                history_type,
                start_index,
                count,
            })
            .await?;
        let ResponseBody::SinglePointHistory(data) = response else {
            return Err(ClientError::Data("opcode 135 returned foreign body".into()));
        };
        Ok(data)
    }

    /// Opcode 137.
    pub async fn read_daily_history_index(
        &self,
        segment: u8,
        day: u8,
        month: u8,
    ) -> Result<DailyHistoryIndex> {
        let response = self
            .exchange(RequestBody::DailyHistoryIndex { segment, day, month })
            .await?;
        let ResponseBody::DailyHistoryIndex(data) = response else {
            return Err(ClientError::Data("opcode 137 returned foreign body".into()));
        };
        Ok(data)
    }

    /// Opcode 50 with the logical-number selector.
    pub async fn get_io_logical_numbers(&self) -> Result<BTreeMap<u8, u8>> {
        let data = self.io_location(IoLocationKind::LogicalNumbers).await?;
        self.state().io.logical_numbers_uploaded = true;
        Ok(data)
    }

    /// Opcode 50 with the point-type selector.
    pub async fn get_io_point_types(&self) -> Result<BTreeMap<u8, u8>> {
        let data = self.io_location(IoLocationKind::PointTypes).await?;
        self.state().io.point_types_uploaded = true;
        Ok(data)
    }

    async fn io_location(&self, kind: IoLocationKind) -> Result<BTreeMap<u8, u8>> {
        let response = self.exchange(RequestBody::IoLocation { kind }).await?;
        let ResponseBody::IoLocation(data) = response else {
            return Err(ClientError::Data("opcode 50 returned foreign body".into()));
        };
        Ok(data.locations)
    }

    // ---- configuration bootstrap -----------------------------------

    /// Read logical numbers and point types for every physical location.
    pub async fn get_physical_io_definition(&self) -> Result<IoDefinition> {
        tracing::debug!("reading physical I/O definition");
        let logical_numbers = self.get_io_logical_numbers().await?;
        {
            let mut snapshot = self.state();
            for (location, logical_number) in logical_numbers {
                snapshot.io.io_map.insert(
                    location,
                    IoPointDefinition {
                        physical_location: location,
                        logical_number: Some(logical_number),
                        ..Default::default()
                    },
                );
            }
        }

        let point_types = self.get_io_point_types().await?;
        let mut snapshot = self.state();
        for (location, point_type) in point_types {
            snapshot
                .io
                .io_map
                .entry(location)
                .or_insert_with(|| IoPointDefinition {
                    physical_location: location,
                    ..Default::default()
                })
                .point_type = Some(point_type);
        }
        Ok(snapshot.io.clone())
    }

    /// Read `POINT_TAG_ID` for every analog-input location and fill the
    /// I/O map with tag names. Requires point types to be uploaded first.
    pub async fn get_io_point_tag_ids(&self) -> Result<IoDefinition> {
        let tag_parameter = {
            let snapshot = self.state();
            if !snapshot.io.point_types_uploaded {
                return Err(ClientError::Data(
                    "I/O point types not uploaded; read the physical I/O definition first".into(),
                ));
            }
            roctlp::registry()
                .point_type_by_number(ANALOG_INPUTS)?
                .parameter_by_name("POINT_TAG_ID")?
                .number
        };

        let tag_tlps: Vec<TlpInstance> = {
            let snapshot = self.state();
            snapshot
                .io
                .points_for_point_type(ANALOG_INPUTS)
                .into_iter()
                .map(|p| TlpInstance::new(ANALOG_INPUTS, p.physical_location, tag_parameter))
                .collect()
        };

        if !tag_tlps.is_empty() {
            let values = self.read_tlps(tag_tlps).await?;
            let mut snapshot = self.state();
            for value in values {
                let tag = expect_str(&value)?;
                if let Some(point) = snapshot.io.io_map.get_mut(&value.tlp.logical_number) {
                    point.point_tag_id = Some(tag);
                }
            }
        }

        let mut snapshot = self.state();
        snapshot.io.point_tag_ids_uploaded = true;
        Ok(snapshot.io.clone())
    }

    /// Full I/O bootstrap: physical definition, then tag names.
    pub async fn initialize_io_definition(&self) -> Result<IoDefinition> {
        tracing::debug!("initializing I/O definition");
        self.get_physical_io_definition().await?;
        self.get_io_point_tag_ids().await?;
        let mut snapshot = self.state();
        snapshot.io.fully_defined = true;
        Ok(snapshot.io.clone())
    }

    /// Read the 44 data slots of one configurable opcode table.
    pub async fn get_opcode_table_definition(
        &self,
        table_index: u8,
    ) -> Result<Vec<OpcodeTableEntry>> {
        tracing::debug!(table_index, "reading configurable opcode table");
        let values = self
            .read_contiguous_tlps(CONFIGURABLE_OPCODE, table_index, OPCODE_TABLE_SLOTS, 1)
            .await?;

        let snapshot = self.state();
        let mut entries = Vec::new();
        for value in &values {
            let triple = expect_tlp(value)?;
            // A zero point type marks an unconfigured slot.
            if triple.is_empty() {
                continue;
            }
            let mut tlp = TlpInstance::from(triple);
            tlp.tag_name = snapshot
                .io
                .tag_for(tlp.logical_number)
                .map(str::to_owned);
            entries.push(OpcodeTableEntry {
                table_index,
                data_index: value.tlp.parameter,
                tlp,
            });
        }
        Ok(entries)
    }

    /// Read all sixteen configurable opcode tables.
    pub async fn initialize_configurable_opcode_definition(
        &self,
    ) -> Result<ConfigurableOpcodeTables> {
        for table_index in 0..OPCODE_TABLE_COUNT {
            let entries = self.get_opcode_table_definition(table_index).await?;
            self.state().opcode_tables.tables.insert(table_index, entries);
        }
        let mut snapshot = self.state();
        snapshot.opcode_tables.fully_defined = true;
        Ok(snapshot.opcode_tables.clone())
    }

    /// Read the configuration of one history point.
    pub async fn get_history_segment_point_configuration(
        &self,
        segment: u8,
        point: u8,
    ) -> Result<HistoryPointConfiguration> {
        let point_type = history_segment_point_configuration(segment);
        let values = self.read_contiguous_tlps(point_type, point, 5, 0).await?;
        let [tag, description, log_point, archive, averaging] = values.as_slice() else {
            return Err(ClientError::Data(format!(
                "expected 5 history point parameters, got {}",
                values.len()
            )));
        };

        let log_triple = expect_tlp(log_point)?;
        let history_log_point = if log_triple.is_empty() {
            None
        } else {
            let mut tlp = TlpInstance::from(log_triple);
            let snapshot = self.state();
            if snapshot.io.fully_defined {
                tlp.tag_name = snapshot.io.tag_for(tlp.logical_number).map(str::to_owned);
            }
            Some(tlp)
        };

        Ok(HistoryPointConfiguration {
            point_number: point,
            point_tag_id: expect_str(tag)?,
            parameter_description: expect_str(description)?,
            history_log_point,
            archive_type: HistoryArchiveType::try_from(expect_u8(archive)?)?,
            averaging_rate_type: HistoryAveragingRateType::try_from(expect_u8(averaging)?)?,
        })
    }

    /// Read the scalar configuration of one history segment and,
    /// optionally, all of its point configurations.
    pub async fn get_history_segment_configuration(
        &self,
        segment: u8,
        include_points: bool,
        include_undefined_points: bool,
    ) -> Result<HistorySegmentConfiguration> {
        tracing::debug!(segment, "reading history segment configuration");
        let values = self
            .read_contiguous_tlps(HISTORY_SEGMENT_CONFIGURATION, segment, 14, 0)
            .await?;
        if values.len() != 14 {
            return Err(ClientError::Data(format!(
                "expected 14 history segment parameters, got {}",
                values.len()
            )));
        }

        let weighting_triple = expect_tlp(&values[13])?;
        let user_weighting_tlp = if weighting_triple.is_empty() {
            None
        } else {
            Some(TlpInstance::from(weighting_triple))
        };

        let segment_size = expect_u16(&values[1])?;
        let mut config = HistorySegmentConfiguration {
            segment_number: segment,
            description: expect_str(&values[0])?,
            segment_size,
            max_segment_size: expect_u16(&values[2])?,
            periodic_entries: expect_u16(&values[3])?,
            periodic_index: expect_u16(&values[4])?,
            daily_entries: expect_u16(&values[5])?,
            daily_index: expect_u16(&values[6])?,
            periodic_sample_rate: expect_u16(&values[7])?,
            contract_hour: expect_u8(&values[8])?,
            logging_enabled: expect_u8(&values[9])? != 0,
            free_space: expect_u32(&values[10])?,
            configured_point_count: expect_u8(&values[12])?,
            user_weighting_tlp,
            points: Vec::new(),
        };

        if include_points {
            for point in 0..segment_size.min(u16::from(u8::MAX)) as u8 {
                let point_config = self
                    .get_history_segment_point_configuration(segment, point)
                    .await?;
                if point_config.history_log_point.is_none() && !include_undefined_points {
                    continue;
                }
                config.points.push(point_config);
            }
        }
        Ok(config)
    }

    /// Read every history segment, including point configurations.
    pub async fn initialize_history_definition(&self) -> Result<HistoryDefinition> {
        tracing::info!("initializing history definition");
        for segment in 0..HISTORY_SEGMENT_COUNT {
            let config = self
                .get_history_segment_configuration(segment, true, true)
                .await?;
            self.state().history.segments.insert(segment, config);
        }
        let mut snapshot = self.state();
        snapshot.history.fully_defined = true;
        Ok(snapshot.history.clone())
    }

    /// Full configuration dump as JSON, bootstrapping whatever snapshots
    /// have not been read yet.
    pub async fn dump_config_json(&self) -> Result<String> {
        if !self.state().io.fully_defined {
            self.initialize_io_definition().await?;
        }
        if !self.state().history.fully_defined {
            self.initialize_history_definition().await?;
        }
        if !self.state().opcode_tables.fully_defined {
            self.initialize_configurable_opcode_definition().await?;
        }
        if self.state().system_config.is_none() {
            self.get_system_config().await?;
        }
        self.snapshot()
            .dump_json()
            .map_err(|e| ClientError::Data(format!("failed to serialize snapshot: {e}")))
    }

    /// Fill tag names from the I/O map once it is fully defined.
    fn named_values(&self, mut values: Vec<TlpValue>) -> Vec<TlpValue> {
        let snapshot = self.state();
        if snapshot.io.fully_defined {
            for value in &mut values {
                if value.tlp.tag_name.is_none() {
                    value.tlp.tag_name = snapshot
                        .io
                        .tag_for(value.tlp.logical_number)
                        .map(str::to_owned);
                }
            }
        }
        values
    }
}

fn expect_str(value: &TlpValue) -> Result<String> {
    value
        .value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| data_mismatch(value, "string"))
}

fn expect_u8(value: &TlpValue) -> Result<u8> {
    value
        .value
        .as_u8()
        .ok_or_else(|| data_mismatch(value, "u8"))
}

fn expect_u16(value: &TlpValue) -> Result<u16> {
    value
        .value
        .as_u16()
        .ok_or_else(|| data_mismatch(value, "u16"))
}

fn expect_u32(value: &TlpValue) -> Result<u32> {
    value
        .value
        .as_u32()
        .ok_or_else(|| data_mismatch(value, "u32"))
}

fn expect_tlp(value: &TlpValue) -> Result<TlpTriple> {
    value
        .value
        .as_tlp()
        .ok_or_else(|| data_mismatch(value, "TLP"))
}

fn data_mismatch(value: &TlpValue, expected: &str) -> ClientError {
    ClientError::Data(format!(
        "parameter ({}, {}, {}) did not decode as {expected}",
        value.tlp.point_type, value.tlp.logical_number, value.tlp.parameter
    ))
}
