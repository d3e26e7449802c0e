//! Схема зала: чистая функция (размер сетки, занятые места) -> места со статусами.

use std::collections::{BTreeMap, HashSet};

use crate::models::{BookedSeat, Seat, SeatStatus};

pub const ROWS: u32 = 8;
pub const SEATS_PER_ROW: u32 = 10;
/// Наценка на последний (VIP) ряд.
pub const VIP_MULTIPLIER: f64 = 1.5;

/// Строит сетку `rows` x `cols`: A1..H10, последний ряд VIP.
pub fn generate_layout(rows: u32, cols: u32) -> Vec<Seat> {
    let mut seats = Vec::with_capacity((rows * cols) as usize);
    for r in 0..rows {
        let row = char::from_u32('A' as u32 + r).unwrap_or('?');
        let price_modifier = if r + 1 == rows { VIP_MULTIPLIER } else { 1.0 };
        for c in 1..=cols {
            seats.push(Seat {
                id: format!("{}{}", row, c),
                row,
                number: c,
                row_index: r,
                seat_index: c,
                status: SeatStatus::Available,
                price_modifier,
            });
        }
    }
    seats
}

/// Помечает занятые места, пересекая сетку со списком от сервера.
pub fn mark_occupied(seats: Vec<Seat>, booked: &[BookedSeat]) -> Vec<Seat> {
    let taken: HashSet<(u32, u32)> = booked.iter().map(|b| (b.row_index, b.seat_index)).collect();
    seats
        .into_iter()
        .map(|mut seat| {
            if taken.contains(&(seat.row_index, seat.seat_index)) {
                seat.status = SeatStatus::Occupied;
            }
            seat
        })
        .collect()
}

/// Схема зала для одного сеанса.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatMap {
    seats: Vec<Seat>,
}

impl SeatMap {
    pub fn new(booked: &[BookedSeat]) -> Self {
        Self::with_shape(ROWS, SEATS_PER_ROW, booked)
    }

    pub fn with_shape(rows: u32, cols: u32, booked: &[BookedSeat]) -> Self {
        Self { seats: mark_occupied(generate_layout(rows, cols), booked) }
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn get(&self, seat_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == seat_id)
    }

    /// Статус для отрисовки: выбранное место перекрывает VIP и свободное.
    pub fn display_status(&self, seat: &Seat, selected: &[String]) -> SeatStatus {
        match seat.status {
            SeatStatus::Occupied | SeatStatus::Locked => seat.status,
            _ if selected.iter().any(|id| id == &seat.id) => SeatStatus::Selected,
            _ if seat.is_vip() => SeatStatus::Vip,
            _ => SeatStatus::Available,
        }
    }

    /// Места, сгруппированные по буквам рядов в порядке A..H.
    pub fn rows(&self) -> BTreeMap<char, Vec<&Seat>> {
        let mut rows: BTreeMap<char, Vec<&Seat>> = BTreeMap::new();
        for seat in &self.seats {
            rows.entry(seat.row).or_default().push(seat);
        }
        rows
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.status == SeatStatus::Occupied).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_eight_by_ten_with_vip_last_row() {
        let seats = generate_layout(ROWS, SEATS_PER_ROW);
        assert_eq!(seats.len(), 80);
        assert_eq!(seats.first().unwrap().id, "A1");
        assert_eq!(seats.last().unwrap().id, "H10");
        assert!(seats.iter().filter(|s| s.row == 'H').all(|s| s.price_modifier == 1.5));
        assert!(seats.iter().filter(|s| s.row != 'H').all(|s| s.price_modifier == 1.0));
    }

    #[test]
    fn booked_pairs_become_occupied() {
        let map = SeatMap::new(&[
            BookedSeat { row_index: 0, seat_index: 1 },
            BookedSeat { row_index: 7, seat_index: 10 },
            // за пределами сетки, игнорируется
            BookedSeat { row_index: 9, seat_index: 1 },
        ]);
        assert_eq!(map.occupied_count(), 2);
        assert_eq!(map.get("A1").unwrap().status, SeatStatus::Occupied);
        assert_eq!(map.get("H10").unwrap().status, SeatStatus::Occupied);
        assert_eq!(map.get("A2").unwrap().status, SeatStatus::Available);
    }

    #[test]
    fn display_status_overlays_selection() {
        let map = SeatMap::new(&[BookedSeat { row_index: 0, seat_index: 1 }]);
        let selected = vec!["H2".to_string(), "A1".to_string()];
        assert_eq!(map.display_status(map.get("H2").unwrap(), &selected), SeatStatus::Selected);
        assert_eq!(map.display_status(map.get("H3").unwrap(), &selected), SeatStatus::Vip);
        assert_eq!(map.display_status(map.get("A1").unwrap(), &selected), SeatStatus::Occupied);
        assert_eq!(map.display_status(map.get("B1").unwrap(), &selected), SeatStatus::Available);
    }

    #[test]
    fn rows_are_ordered() {
        let map = SeatMap::new(&[]);
        let rows: Vec<char> = map.rows().keys().copied().collect();
        assert_eq!(rows, vec!['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H']);
    }
}
