pub mod recording_archive;
