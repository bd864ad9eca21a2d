use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingRequest, BookingStatus, Frequency, Language, TimeOfDay};

use super::BookingStore;

const SCHEMA: &str = "
PRAGMA journal_mode=WAL;
CREATE TABLE IF NOT EXISTS bookings (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    address TEXT NOT NULL,
    num_cats INTEGER NOT NULL,
    frequency TEXT NOT NULL,
    plan TEXT NOT NULL,
    time_of_day TEXT NOT NULL,
    notes TEXT,
    language TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL
);
";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("failed to open database")?;
        conn.execute_batch(SCHEMA)
            .context("failed to initialize bookings schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn create(&self, request: BookingRequest) -> anyhow::Result<Booking> {
        let booking = Booking::from_request(request);
        let created_at = booking.created_at.format("%Y-%m-%d %H:%M:%S").to_string();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO bookings (id, name, email, phone, address, num_cats, frequency, plan, time_of_day, notes, language, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                booking.id,
                booking.name,
                booking.email,
                booking.phone,
                booking.address,
                booking.num_cats,
                booking.frequency.as_str(),
                booking.plan,
                booking.time_of_day.as_str(),
                booking.notes,
                booking.language.as_str(),
                booking.status.as_str(),
                created_at,
            ],
        )?;
        Ok(booking)
    }

    async fn list(&self) -> anyhow::Result<Vec<Booking>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, phone, address, num_cats, frequency, plan, time_of_day, notes, language, status, created_at
             FROM bookings ORDER BY created_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

        let mut bookings = vec![];
        for row in rows {
            bookings.push(row??);
        }
        Ok(bookings)
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> anyhow::Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count = conn.execute(
            "UPDATE bookings SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(count > 0)
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
        Ok(count > 0)
    }
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let email: Option<String> = row.get(2)?;
    let phone: Option<String> = row.get(3)?;
    let address: String = row.get(4)?;
    let num_cats: u32 = row.get(5)?;
    let frequency_str: String = row.get(6)?;
    let plan: String = row.get(7)?;
    let time_of_day_str: String = row.get(8)?;
    let notes: Option<String> = row.get(9)?;
    let language_str: String = row.get(10)?;
    let status_str: String = row.get(11)?;
    let created_at_str: String = row.get(12)?;

    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        name,
        email,
        phone,
        address,
        num_cats,
        frequency: Frequency::parse(&frequency_str),
        plan,
        time_of_day: TimeOfDay::parse(&time_of_day_str),
        notes,
        language: Language::parse(&language_str),
        status: BookingStatus::parse(&status_str),
        created_at,
    })
}
