mod transport_state;
