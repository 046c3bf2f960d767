mod command;
mod params;
