/*!
# Movie Poll

A tutorial-style interactive web application, built in Rust.

## Overview

Three incremental pages served by one small web server:

1. **Hello** - collects a name and an age, greets the user, and draws a
   line chart from freshly generated random numbers.
2. **Recommender** - recommends movie titles from a fixed lookup table
   keyed by genre.
3. **Records** - a form that appends submitted entries to a remote
   spreadsheet-backed store, with aggregate statistics, a raw-data table
   behind a checkbox, and a date-stamped CSV download.

## Architecture

The application follows a request-per-interaction model:

### Frontend Layer
- **Technologies**: HTML, CSS, a little vanilla JavaScript
- Each page is a static document that fetches JSON from the API and
  re-renders its widgets after every interaction; the server keeps no
  per-client state.

### Backend Layer
- **Technologies**: Rust, axum
- **Core Components**:
  - Record Store - append-only log of submitted entries
  - Sheets Client - thin wrapper over the remote spreadsheet's `values` API
  - Recommendation Lookup - fixed genre-to-titles table
  - Statistics - total/average/per-genre counts over all records
  - Chart Renderer - PNG line chart of random series

### Data Persistence Layer
- One worksheet of a remote spreadsheet, one row per record, header row
  `timestamp,name,age,favorite_genre`
- CSV export with a date-stamped filename
- Records are immutable once appended; no update or delete path

## Modules

- **record**: the `UserRecord` type, the genre set, row/CSV field mapping
- **store**: the `RecordStore` trait, store errors, the in-memory store
- **sheets**: the remote spreadsheet-backed store
- **recommend**: fixed genre-to-titles lookup
- **stats**: aggregate summary for the sidebar
- **chart**: random series and PNG rendering
- **downloader**: CSV export
- **loader**: CSV import (round-trip parsing)
- **config**: TOML secrets/configuration loading
- **app**: routing and handlers

## REST API Endpoints

- `POST /api/greet` - greeting for a (possibly empty) name
- `GET /api/chart.png` - random line chart image
- `GET /api/recommend?genre=X` - titles for a genre
- `POST /api/records` - submit one record
- `GET /api/records` - all records, best effort
- `GET /api/stats` - aggregate summary
- `GET /api/export` - CSV download of all records
*/

// Re-export all modules so they appear in the documentation
pub mod app;
pub mod chart;
pub mod config;
pub mod downloader;
pub mod loader;
pub mod recommend;
pub mod record;
pub mod sheets;
pub mod stats;
pub mod store;

/// Re-export the core types to make them easier to use
pub use record::{Genre, UserRecord};
pub use sheets::SheetsStore;
pub use store::{MemoryStore, RecordStore, StoreError};
