use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{Page, RoomWithType, Stay};
use crate::store::RoomStore;

pub struct AvailabilityService {
    rooms: Arc<dyn RoomStore>,
}

impl AvailabilityService {
    pub fn new(rooms: Arc<dyn RoomStore>) -> Self {
        Self { rooms }
    }

    /// Rooms that can take a reservation for `[check_in, check_out)`.
    ///
    /// Equal dates are accepted. A zero-night stay still conflicts with an
    /// active booking whose range holds that date strictly inside it.
    pub async fn get_available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<RoomWithType>, AppError> {
        if check_in > check_out {
            return Err(AppError::InvalidData(
                "check-in date must not be after check-out date".to_string(),
            ));
        }

        let rooms = self
            .rooms
            .available_rooms(&Stay::new(check_in, check_out))
            .await?;
        tracing::debug!(%check_in, %check_out, count = rooms.len(), "available rooms");
        Ok(rooms)
    }

    pub async fn list_rooms_with_type(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Page<RoomWithType>, AppError> {
        Ok(self.rooms.list_with_type(skip, limit).await?)
    }
}
