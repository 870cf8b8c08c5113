mod test_frame_basic;
mod test_primitive_basic;
