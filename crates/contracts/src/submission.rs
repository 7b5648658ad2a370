//! NativeAppSubmission - the batch envelope posted to the collector
//!
//! Built fresh for every flush from host-supplied identity and the decoded
//! stored events. Never persisted.

use codec::{required, skip, CompactReader, CompactWriter, InputTransport, OutputTransport};
use codec::{Result, ThriftStruct};
use serde::{Deserialize, Serialize};

use crate::wire::{read_field_into, read_struct, write_field, write_opt_field, write_struct};
use crate::{Edition, Event, MembershipTier, SubscriptionType};

/// Application build information
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct App {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub edition: Option<Edition>,
}

impl ThriftStruct for App {
    const NAME: &'static str = "App";

    fn write<T: OutputTransport>(&self, w: &mut CompactWriter<T>) -> Result<()> {
        write_struct(w, Self::NAME, |w| {
            write_opt_field(w, "version", 1, &self.version)?;
            write_opt_field(w, "family", 2, &self.family)?;
            write_opt_field(w, "os", 3, &self.os)?;
            write_opt_field(w, "edition", 4, &self.edition)
        })
    }

    fn read<T: InputTransport>(r: &mut CompactReader<T>) -> Result<Self> {
        let mut app = App::default();
        read_struct(r, |r, field| match field.field_id {
            1 => read_field_into(r, field, "version", &mut app.version),
            2 => read_field_into(r, field, "family", &mut app.family),
            3 => read_field_into(r, field, "os", &mut app.os),
            4 => read_field_into(r, field, "edition", &mut app.edition),
            _ => skip(r, field.ttype),
        })?;
        Ok(app)
    }
}

/// Hardware the app runs on
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
}

impl ThriftStruct for Device {
    const NAME: &'static str = "Device";

    fn write<T: OutputTransport>(&self, w: &mut CompactWriter<T>) -> Result<()> {
        write_struct(w, Self::NAME, |w| {
            write_opt_field(w, "name", 1, &self.name)?;
            write_opt_field(w, "manufacturer", 2, &self.manufacturer)
        })
    }

    fn read<T: InputTransport>(r: &mut CompactReader<T>) -> Result<Self> {
        let mut device = Device::default();
        read_struct(r, |r, field| match field.field_id {
            1 => read_field_into(r, field, "name", &mut device.name),
            2 => read_field_into(r, field, "manufacturer", &mut device.manufacturer),
            _ => skip(r, field.ttype),
        })?;
        Ok(device)
    }
}

/// A batch of events plus the identity they were recorded under
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NativeAppSubmission {
    pub app: App,
    pub device: Option<Device>,
    pub device_id: String,
    pub user_id: Option<String>,
    pub krux_id: Option<String>,
    pub subscription_id: Option<SubscriptionType>,
    pub events: Vec<Event>,
    pub membership_tier: Option<MembershipTier>,
}

impl ThriftStruct for NativeAppSubmission {
    const NAME: &'static str = "NativeAppSubmission";

    fn write<T: OutputTransport>(&self, w: &mut CompactWriter<T>) -> Result<()> {
        write_struct(w, Self::NAME, |w| {
            write_field(w, "app", 2, &self.app)?;
            write_opt_field(w, "device", 3, &self.device)?;
            write_field(w, "deviceId", 4, &self.device_id)?;
            write_opt_field(w, "userId", 5, &self.user_id)?;
            write_opt_field(w, "kruxId", 8, &self.krux_id)?;
            write_opt_field(w, "subscriptionId", 6, &self.subscription_id)?;
            write_field(w, "events", 7, &self.events)?;
            write_opt_field(w, "membershipTier", 9, &self.membership_tier)
        })
    }

    fn read<T: InputTransport>(r: &mut CompactReader<T>) -> Result<Self> {
        let mut app = None;
        let mut device = None;
        let mut device_id = None;
        let mut user_id = None;
        let mut krux_id = None;
        let mut subscription_id = None;
        let mut events = None;
        let mut membership_tier = None;
        read_struct(r, |r, field| match field.field_id {
            2 => read_field_into(r, field, "app", &mut app),
            3 => read_field_into(r, field, "device", &mut device),
            4 => read_field_into(r, field, "deviceId", &mut device_id),
            5 => read_field_into(r, field, "userId", &mut user_id),
            8 => read_field_into(r, field, "kruxId", &mut krux_id),
            6 => read_field_into(r, field, "subscriptionId", &mut subscription_id),
            7 => read_field_into(r, field, "events", &mut events),
            9 => read_field_into(r, field, "membershipTier", &mut membership_tier),
            _ => skip(r, field.ttype),
        })?;
        Ok(Self {
            app: required(app, Self::NAME, "app")?,
            device,
            device_id: required(device_id, Self::NAME, "deviceId")?,
            user_id,
            krux_id,
            subscription_id,
            events: required(events, Self::NAME, "events")?,
            membership_tier,
        })
    }
}

wire_struct!(App, Device);
