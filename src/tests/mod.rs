mod phase_tests;
