mod calibration;
mod centroids;
mod events;
mod rooms;
