use serde::Deserialize;

/// Plot-booking form submission; every field is optional free-form text.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBookingRequest {
    pub plot_id: Option<String>,
    pub plot_size: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub crop_type: Option<String>,
    pub watering_freq: Option<String>,
    pub compost: Option<String>,
    pub irrigation_slot: Option<String>,
    pub shared: Option<String>,
    pub tool_kit: Option<String>,
    pub water_access: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}
